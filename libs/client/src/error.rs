//! Error types shared across the crate.

use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the client.
///
/// There are exactly two families: configuration problems raised while
/// building the client, and failures delegated from the backend itself
/// (transport, non-success status, undecodable body). The client never
/// retries or reclassifies a delegated failure.
#[derive(Debug, Error)]
pub enum Error {
    /// A required credential is unset or empty.
    #[error("missing credentials: {0} must be set and non-empty")]
    MissingCredentials(String),

    /// A configuration value could not be used to build the client.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Transport-level failure from the HTTP client.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Non-success response from the backend, message decoded as-is.
    #[error("supabase error {status}: {message}")]
    Api {
        /// HTTP status returned by the backend.
        status: StatusCode,
        /// Message from the backend's error payload, or the raw body.
        message: String,
    },

    /// Response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Error payload shapes emitted by the auth, storage and rest services.
///
/// The services disagree on field names (`msg`, `message`,
/// `error_description`, `error`), so all are tried in that order.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl ApiErrorBody {
    fn into_message(self) -> Option<String> {
        self.msg
            .or(self.message)
            .or(self.error_description)
            .or(self.error)
    }
}

/// Turn a non-success response into [`Error::Api`], keeping the backend's
/// own message where one can be decoded.
pub(crate) async fn check_status(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .ok()
        .and_then(ApiErrorBody::into_message)
        .unwrap_or(body);

    Err(Error::Api { status, message })
}

/// Check the status, then decode the JSON body into `T`.
pub(crate) async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = check_status(response).await?;
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}
