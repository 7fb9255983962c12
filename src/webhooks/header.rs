use chrono::{DateTime, Utc};

use super::SIGNING_VERSION;
use crate::error::WebhookError;

/// A parsed signature header: the claimed signing time and every
/// current-version signature attached to it, in header order.
///
/// Never holds zero signatures; [`parse_header`] reports
/// [`WebhookError::NoValidSignature`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeader {
    timestamp: DateTime<Utc>,
    signatures: Vec<Vec<u8>>,
}

impl SignedHeader {
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn signatures(&self) -> &[Vec<u8>] {
        &self.signatures
    }
}

/// Encode a timestamp and signature as a header value,
/// e.g. `t=1601036356,v1=5257a869...`.
pub fn make_header(timestamp: DateTime<Utc>, signature: &[u8]) -> String {
    format!(
        "t={},{}={}",
        timestamp.timestamp(),
        SIGNING_VERSION,
        hex::encode(signature)
    )
}

/// Parse a header value such as `t=1601036356,v1=FOO,v1=BAR,v0=BAZ`.
///
/// Unknown fields and other scheme versions are ignored. `v1` entries that
/// are not valid hex are skipped. A repeated `t` field overrides earlier ones.
pub fn parse_header(header: &str) -> Result<SignedHeader, WebhookError> {
    if header.is_empty() {
        return Err(WebhookError::NoSignature);
    }

    // Without a `t` field the timestamp stays at the epoch and fails freshness.
    let mut timestamp = DateTime::<Utc>::UNIX_EPOCH;
    let mut signatures = Vec::new();

    for field in header.split(',') {
        let (name, value) = split_field(field).ok_or(WebhookError::InvalidHeader)?;

        match name {
            "t" => {
                let secs: i64 = value.parse().map_err(|_| WebhookError::InvalidHeader)?;
                timestamp =
                    DateTime::from_timestamp(secs, 0).ok_or(WebhookError::InvalidHeader)?;
            }
            SIGNING_VERSION => match hex::decode(value) {
                Ok(sig) => signatures.push(sig),
                Err(_) => continue,
            },
            _ => continue,
        }
    }

    if signatures.is_empty() {
        return Err(WebhookError::NoValidSignature);
    }

    Ok(SignedHeader {
        timestamp,
        signatures,
    })
}

/// Split `name=value`; exactly one `=` and a non-empty name.
fn split_field(field: &str) -> Option<(&str, &str)> {
    let (name, value) = field.split_once('=')?;
    if name.is_empty() || value.contains('=') {
        return None;
    }
    Some((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_make_header_format() {
        let header = make_header(at(1_601_036_356), &[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(header, "t=1601036356,v1=deadbeef");
    }

    #[test]
    fn test_round_trip() {
        let sig = vec![0xab; 32];
        let parsed = parse_header(&make_header(at(1_601_036_356), &sig)).unwrap();

        assert_eq!(parsed.timestamp(), at(1_601_036_356));
        assert_eq!(parsed.signatures(), &[sig]);
    }

    #[test]
    fn test_empty_header_is_no_signature() {
        assert_eq!(parse_header(""), Err(WebhookError::NoSignature));
    }

    #[test]
    fn test_multiple_signatures_keep_order() {
        let parsed = parse_header("t=10,v1=aa,v0=bb,v1=cc").unwrap();
        assert_eq!(parsed.signatures(), &[vec![0xaa], vec![0xcc]]);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let parsed = parse_header("t=10,v0=garbage,foo=bar,v1=0102").unwrap();
        assert_eq!(parsed.signatures(), &[vec![0x01, 0x02]]);
    }

    #[test]
    fn test_invalid_hex_signatures_are_skipped() {
        let parsed = parse_header("t=10,v1=not-hex,v1=0a0b").unwrap();
        assert_eq!(parsed.signatures(), &[vec![0x0a, 0x0b]]);

        assert_eq!(parse_header("t=10,v1=abc"), Err(WebhookError::NoValidSignature));
    }

    #[test]
    fn test_empty_signature_is_collected() {
        let parsed = parse_header("t=10,v1=").unwrap();
        assert_eq!(parsed.signatures(), &[Vec::<u8>::new()]);
    }

    #[test]
    fn test_no_current_version_signature() {
        assert_eq!(parse_header("t=10,c=not-valid"), Err(WebhookError::NoValidSignature));
        assert_eq!(parse_header("t=10"), Err(WebhookError::NoValidSignature));
    }

    #[test]
    fn test_malformed_fields() {
        assert_eq!(parse_header("t=10,missing-equality"), Err(WebhookError::InvalidHeader));
        assert_eq!(parse_header("t=10,v1=aa=bb"), Err(WebhookError::InvalidHeader));
        assert_eq!(parse_header("t=10,=aa"), Err(WebhookError::InvalidHeader));
        assert_eq!(parse_header("t=10,,v1=aa"), Err(WebhookError::InvalidHeader));
        assert_eq!(parse_header(","), Err(WebhookError::InvalidHeader));
    }

    #[test]
    fn test_bad_timestamps() {
        assert_eq!(parse_header("t=invalid-timestamp"), Err(WebhookError::InvalidHeader));
        assert_eq!(parse_header("t=,v1=aa"), Err(WebhookError::InvalidHeader));
        assert_eq!(parse_header("t=1.5,v1=aa"), Err(WebhookError::InvalidHeader));
        assert_eq!(
            parse_header(&format!("t={},v1=aa", i64::MAX)),
            Err(WebhookError::InvalidHeader)
        );
    }

    #[test]
    fn test_last_timestamp_wins() {
        let parsed = parse_header("t=10,v1=aa,t=20").unwrap();
        assert_eq!(parsed.timestamp(), at(20));
    }

    #[test]
    fn test_missing_timestamp_defaults_to_epoch() {
        let parsed = parse_header("v1=aa").unwrap();
        assert_eq!(parsed.timestamp(), DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn test_negative_timestamp_parses() {
        let parsed = parse_header("t=-60,v1=aa").unwrap();
        assert_eq!(parsed.timestamp(), at(-60));
    }

    #[test]
    fn test_uppercase_hex_is_accepted() {
        let parsed = parse_header("t=10,v1=ABCD").unwrap();
        assert_eq!(parsed.signatures(), &[vec![0xab, 0xcd]]);
    }
}
