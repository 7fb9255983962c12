//! Webhook signing and verification.
//!
//! Event Dripper signs every notification it delivers. The signature header
//! looks like `t=1601036356,v1=<hex>[,v1=<hex>...]`, where each `v1` entry is
//! an HMAC-SHA256 over `"<t>.<payload>"` keyed by the shared secret. Several
//! `v1` entries may be present while a secret is being rotated.
//!
//! Receivers call [`construct_notification`] (or hold a [`WebhookVerifier`])
//! to authenticate the request before the body is decoded.
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use eventdripper::webhooks::{self, construct_notification};
//!
//! let payload = br#"{"trigger_name":"trigger-name","entity_id":"entity-id","events":[]}"#;
//! let header = webhooks::sign(b"shared-secret", Utc::now(), payload);
//!
//! let notification = construct_notification(payload, &header, "shared-secret").unwrap();
//! assert_eq!(notification.trigger_name, "trigger-name");
//! ```

use std::time::Duration;

#[cfg(feature = "axum")]
pub mod extractor;
pub mod header;
pub mod signature;
pub mod verification;

#[cfg(feature = "axum")]
pub use extractor::VerifiedNotification;
pub use header::{SignedHeader, make_header, parse_header};
pub use signature::{compute_signature, constant_time_compare, sign};
pub use verification::{WebhookVerifier, construct_notification, construct_notification_at};

/// HTTP header carrying the signature of a webhook delivery.
pub const HEADER_KEY: &str = "EventDripper-Signature";

/// Signatures older than this are rejected.
pub const MAX_SIGNATURE_AGE: Duration = Duration::from_secs(300);

/// Version tag of the signing scheme currently in use.
pub const SIGNING_VERSION: &str = "v1";
