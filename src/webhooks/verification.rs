use std::sync::Arc;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};

use super::MAX_SIGNATURE_AGE;
use super::header::parse_header;
use super::signature::{compute_signature, constant_time_compare};
use crate::error::WebhookError;
use crate::notification::Notification;

/// Construct a [`Notification`], verifying the payload using the given
/// signature header and shared secret.
///
/// The payload is only decoded once one of the header's signatures matched.
///
/// # Errors
///
/// - [`WebhookError::NoSignature`] if `header` is empty
/// - [`WebhookError::InvalidHeader`] if a field is malformed
/// - [`WebhookError::SignatureTooOld`] if the signed time is outside the window
/// - [`WebhookError::NoValidSignature`] if no signature matches
/// - [`WebhookError::InvalidPayload`] if the authenticated body is not a notification
pub fn construct_notification(
    payload: &[u8],
    header: &str,
    secret: &str,
) -> Result<Notification, WebhookError> {
    construct_notification_at(payload, header, secret.as_bytes(), Utc::now())
}

/// Same as [`construct_notification`], evaluating freshness against `now`.
pub fn construct_notification_at(
    payload: &[u8],
    header: &str,
    secret: &[u8],
    now: DateTime<Utc>,
) -> Result<Notification, WebhookError> {
    let signed = parse_header(header)?;

    // Only staleness is checked; a timestamp ahead of `now` is accepted.
    if let Ok(age) = now.signed_duration_since(signed.timestamp()).to_std() {
        if age > MAX_SIGNATURE_AGE {
            return Err(WebhookError::SignatureTooOld);
        }
    }

    let expected = compute_signature(secret, signed.timestamp(), payload);
    let matched = signed
        .signatures()
        .iter()
        .any(|candidate| constant_time_compare(&expected, candidate));

    if !matched {
        return Err(WebhookError::NoValidSignature);
    }

    serde_json::from_slice(payload).map_err(|_| WebhookError::InvalidPayload)
}

/// Reusable webhook receiver holding the shared secret.
///
/// The secret is kept in a [`SecretString`], so `Debug` output never shows
/// it. Cloning is cheap; clones share the secret.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use eventdripper::webhooks::{self, WebhookVerifier};
///
/// let verifier = WebhookVerifier::new("whsec_shared");
///
/// let payload = br#"{"trigger_name":"welcome","entity_id":"user-1"}"#;
/// let header = webhooks::sign(b"whsec_shared", Utc::now(), payload);
///
/// let notification = verifier.verify(payload, &header).unwrap();
/// assert_eq!(notification.entity_id, "user-1");
/// ```
#[derive(Debug, Clone)]
pub struct WebhookVerifier {
    secret: Arc<SecretString>,
}

impl WebhookVerifier {
    pub fn new(secret: impl Into<SecretString>) -> Self {
        Self {
            secret: Arc::new(secret.into()),
        }
    }

    /// Verify a delivery against the current time.
    pub fn verify(&self, payload: &[u8], header: &str) -> Result<Notification, WebhookError> {
        self.verify_at(payload, header, Utc::now())
    }

    /// Verify a delivery against an explicit verification time.
    pub fn verify_at(
        &self,
        payload: &[u8],
        header: &str,
        now: DateTime<Utc>,
    ) -> Result<Notification, WebhookError> {
        let secret = self.secret.expose_secret().as_bytes();

        construct_notification_at(payload, header, secret, now).inspect_err(|err| {
            tracing::debug!(
                target: "eventdripper::webhooks",
                error = %err,
                payload_len = payload.len(),
                "Webhook verification failed"
            );
        })
    }
}
