/// Reasons a signed webhook notification is rejected.
///
/// Every variant is terminal. Callers are expected to branch on the kind
/// (for example to pick an HTTP status) rather than on the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum WebhookError {
    /// The signature header was empty or not sent at all.
    #[error("webhook has no EventDripper-Signature header")]
    NoSignature,

    /// A header field was malformed or the timestamp did not parse.
    #[error("webhook has invalid EventDripper-Signature header")]
    InvalidHeader,

    /// No current-version signature was present, or none of them matched.
    #[error("webhook had no valid signature")]
    NoValidSignature,

    /// The signed timestamp is older than the freshness window.
    #[error("signature timestamp wasn't within tolerance")]
    SignatureTooOld,

    /// The signature matched but the body is not a notification.
    #[error("webhook has invalid payload")]
    InvalidPayload,
}

impl WebhookError {
    /// True for failures that mean the sender could not prove knowledge
    /// of the shared secret, as opposed to a malformed request.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::NoValidSignature | Self::SignatureTooOld)
    }
}

/// The main error type for the crate's outer surfaces (client, configuration).
#[derive(Debug, thiserror::Error)]
pub enum EventDripperError {
    #[error(transparent)]
    Webhook(#[from] WebhookError),

    #[error("unauthorized")]
    Unauthorized,

    #[error("failed to create event; status code {status}")]
    SubmissionFailed { status: u16 },

    #[cfg(feature = "client")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl EventDripperError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn submission_failed(status: u16) -> Self {
        Self::SubmissionFailed { status }
    }

    /// The upstream HTTP status, when the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::SubmissionFailed { status } => Some(*status),
            #[cfg(feature = "client")]
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, EventDripperError>;
