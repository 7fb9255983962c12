use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::header::make_header;

type HmacSha256 = Hmac<Sha256>;

/// Compute the signature of a webhook payload.
///
/// The MAC input is the decimal Unix-seconds value of `timestamp`, a `.`,
/// then the raw payload bytes. Only whole seconds participate.
pub fn compute_signature(secret: &[u8], timestamp: DateTime<Utc>, payload: &[u8]) -> Vec<u8> {
    // HMAC accepts keys of any length, so this never fails.
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");

    mac.update(timestamp.timestamp().to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    mac.finalize().into_bytes().to_vec()
}

/// Sign `payload` and return the complete signature header value.
pub fn sign(secret: &[u8], timestamp: DateTime<Utc>, payload: &[u8]) -> String {
    let signature = compute_signature(secret, timestamp, payload);
    make_header(timestamp, &signature)
}

/// Constant-time comparison of two signatures.
///
/// Lengths are not secret; slices of different length compare unequal
/// without looking at their contents.
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.ct_eq(b).into()
}
