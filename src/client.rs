//! Client for submitting events to the Event Dripper API.
//!
//! Events are posted one at a time; there is no retry or backoff. Callers
//! that want to retry on transport failures do so around [`EventClient::add_event`].
//!
//! # Example
//!
//! ```rust,no_run
//! use eventdripper::EventClient;
//!
//! # async fn run() -> eventdripper::Result<()> {
//! let client = EventClient::new("im api key");
//! client.add_event("user-42", "cart.add", b"{\"sku\":\"A-1\"}").await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::{ClientConfig, DEFAULT_API_HOST};
use crate::error::{EventDripperError, Result};
use crate::notification::base64_bytes;

const USER_AGENT: &str = concat!("eventdripper/", env!("CARGO_PKG_VERSION"));

/// Body of `POST /api/event`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddEventInput {
    pub event_name: String,
    pub entity_id: String,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

/// Event Dripper API client.
///
/// The API key is sent verbatim in the `Authorization` header and is kept
/// in a [`SecretString`] so it never appears in debug output.
#[derive(Debug, Clone)]
pub struct EventClient {
    client: reqwest::Client,
    host: String,
    api_key: Arc<SecretString>,
}

impl EventClient {
    /// Create a client for the production API.
    pub fn new(api_key: impl Into<SecretString>) -> Self {
        Self::with_host(api_key, DEFAULT_API_HOST)
    }

    /// Create a client for a custom host (staging, self-hosted, tests).
    pub fn with_host(api_key: impl Into<SecretString>, host: impl Into<String>) -> Self {
        let host: String = host.into();
        Self {
            client: reqwest::Client::new(),
            host: host.trim_end_matches('/').to_string(),
            api_key: Arc::new(api_key.into()),
        }
    }

    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EventDripperError::Config`] if no API key is configured and
    /// [`EventDripperError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| EventDripperError::config("API key is required for the event client"))?;

        let client = Self::build_client(config.timeout(), USER_AGENT)?;
        Ok(Self::with_host(api_key, config.host.clone()).with_http_client(client))
    }

    /// Use a preconfigured HTTP client for all requests.
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn build_client(timeout: Duration, user_agent: &str) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                tracing::warn!(
                    target: "eventdripper::client",
                    error = %e,
                    "Failed to build HTTP client"
                );
                EventDripperError::from(e)
            })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Submit an event for `entity_id`.
    ///
    /// # Errors
    ///
    /// - [`EventDripperError::Unauthorized`] when the API rejects the key
    /// - [`EventDripperError::SubmissionFailed`] for any other non-201 status
    /// - [`EventDripperError::Http`] when the request could not be sent
    pub async fn add_event(&self, entity_id: &str, event_name: &str, data: &[u8]) -> Result<()> {
        let url = format!("{}/api/event", self.host);
        let input = AddEventInput {
            event_name: event_name.to_string(),
            entity_id: entity_id.to_string(),
            data: data.to_vec(),
        };

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, self.api_key.expose_secret())
            .json(&input)
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED => {
                tracing::debug!(
                    target: "eventdripper::client",
                    entity_id,
                    event_name,
                    "Event submitted"
                );
                Ok(())
            }
            StatusCode::UNAUTHORIZED => {
                tracing::warn!(
                    target: "eventdripper::client",
                    "Event submission rejected: unauthorized"
                );
                Err(EventDripperError::Unauthorized)
            }
            status => {
                tracing::warn!(
                    target: "eventdripper::client",
                    status = status.as_u16(),
                    "Event submission failed"
                );
                Err(EventDripperError::submission_failed(status.as_u16()))
            }
        }
    }
}
