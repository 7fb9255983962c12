//! Event Dripper - signed webhook notifications
//!
//! Event Dripper delivers a [`Notification`] to your webhook endpoint whenever
//! one of your triggers fires. Each delivery carries an
//! `EventDripper-Signature` header; this crate verifies it against your shared
//! secret before the body is trusted or decoded.
//!
//! # Features
//!
//! - **Verification**: HMAC-SHA256 signatures, constant-time comparison and a
//!   five minute replay window ([`webhooks`])
//! - **Signing**: produce the same header when sending notifications
//! - **Axum**: a [`VerifiedNotification`](webhooks::VerifiedNotification)
//!   extractor (`axum` feature, on by default)
//! - **Client**: submit events to the Event Dripper API (`client` feature,
//!   on by default)
//!
//! # Quick Start
//!
//! ```rust
//! use eventdripper::{WebhookError, webhooks};
//!
//! let secret = "whsec_shared";
//! let payload = br#"{"trigger_name":"trigger-name","entity_id":"entity-id","events":[]}"#;
//!
//! // Sender side
//! let header = webhooks::sign(secret.as_bytes(), chrono::Utc::now(), payload);
//!
//! // Receiver side
//! let notification = webhooks::construct_notification(payload, &header, secret).unwrap();
//! assert_eq!(notification.entity_id, "entity-id");
//!
//! let err = webhooks::construct_notification(payload, "", secret).unwrap_err();
//! assert_eq!(err, WebhookError::NoSignature);
//! ```

#[cfg(feature = "client")]
mod client;
mod config;
mod error;
pub mod notification;
mod utils;
pub mod webhooks;

// Re-exports for public API
#[cfg(feature = "client")]
pub use client::{AddEventInput, EventClient};
pub use config::{ClientConfig, Config, ConfigBuilder, DEFAULT_API_HOST, LoggingConfig};
pub use error::{EventDripperError, Result, WebhookError};
pub use notification::{Event, Notification};
pub use webhooks::{
    HEADER_KEY, MAX_SIGNATURE_AGE, SIGNING_VERSION, WebhookVerifier, compute_signature,
    construct_notification, make_header,
};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging with sensible defaults
///
/// # Environment Variables
///
/// - `RUST_LOG`: Set log level (e.g., "info", "eventdripper=debug")
/// - `EVENTDRIPPER_LOG_JSON` (or `LOG_JSON`): Set to "true" for JSON formatted logs
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    install(env_filter, json_logs_from_env());
}

fn json_logs_from_env() -> bool {
    utils::get_env_with_prefix("LOG_JSON")
        .map(|v| v.parse().unwrap_or(false))
        .unwrap_or(false)
}

/// Initialize tracing from a [`Config`]
pub fn init_tracing_with_config(config: &Config) {
    install(EnvFilter::new(&config.logging.level), config.logging.json);
}

fn install(env_filter: EnvFilter, json: bool) {
    let registry = tracing_subscriber::registry().with(env_filter);

    // A subscriber may already be installed (tests, host application).
    let result = if json {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "Tracing subscriber already installed");
    }
}
