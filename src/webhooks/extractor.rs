//! Axum integration for receiving signed webhooks.
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::{Router, routing::post};
//! use eventdripper::webhooks::{VerifiedNotification, WebhookVerifier};
//!
//! async fn receive(VerifiedNotification(notification): VerifiedNotification) -> &'static str {
//!     tracing::info!(trigger = %notification.trigger_name, "notification received");
//!     "ok"
//! }
//!
//! let app: Router = Router::new()
//!     .route("/webhooks/event-dripper", post(receive))
//!     .with_state(WebhookVerifier::new("whsec_shared"));
//! ```

use axum::{
    Json,
    body::Bytes,
    extract::{FromRef, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::HEADER_KEY;
use super::verification::WebhookVerifier;
use crate::error::WebhookError;
use crate::notification::Notification;

/// A notification whose signature was verified before the body was decoded.
///
/// Requires a [`WebhookVerifier`] reachable from the router state.
#[derive(Debug, Clone)]
pub struct VerifiedNotification(pub Notification);

/// Rejection for [`VerifiedNotification`].
#[derive(Debug)]
pub enum WebhookRejection {
    /// The request body could not be read.
    Body(String),
    Verification(WebhookError),
}

impl<S> FromRequest<S> for VerifiedNotification
where
    WebhookVerifier: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = WebhookRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let verifier = WebhookVerifier::from_ref(state);

        // A missing header is the empty string; an unreadable one is malformed.
        let header = match req.headers().get(HEADER_KEY) {
            Some(value) => value
                .to_str()
                .map_err(|_| WebhookRejection::Verification(WebhookError::InvalidHeader))?
                .to_owned(),
            None => String::new(),
        };

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| WebhookRejection::Body(e.body_text()))?;

        verifier
            .verify(&body, &header)
            .map(VerifiedNotification)
            .map_err(WebhookRejection::Verification)
    }
}

impl WebhookError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NoSignature | Self::InvalidHeader | Self::InvalidPayload => {
                StatusCode::BAD_REQUEST
            }
            Self::NoValidSignature | Self::SignatureTooOld => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        tracing::warn!(
            target: "eventdripper::webhooks",
            status = status.as_u16(),
            error = %self,
            "Rejected webhook delivery"
        );

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl IntoResponse for WebhookRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Body(msg) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("Failed to read webhook body: {}", msg) })),
            )
                .into_response(),
            Self::Verification(err) => err.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(WebhookError::NoSignature.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(WebhookError::InvalidHeader.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(WebhookError::InvalidPayload.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(WebhookError::NoValidSignature.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(WebhookError::SignatureTooOld.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_rejection_response_status() {
        let response = WebhookRejection::Verification(WebhookError::SignatureTooOld).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = WebhookRejection::Body("length limit exceeded".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
