//! Error types for the cPanel UAPI client.

use thiserror::Error;

/// Errors produced while talking to the cPanel API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a usable HTTP response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success HTTP status.
    #[error("cPanel returned HTTP {status}: {body}")]
    Http {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The UAPI envelope arrived intact but reported `status: 0`.
    #[error("cPanel reported errors: {}", .errors.join("; "))]
    Api { errors: Vec<String> },

    /// The response body could not be decoded into the expected shape.
    #[error("failed to decode cPanel response: {0}")]
    Parse(String),
}

impl ClientError {
    /// Builds an [`ClientError::Http`] from a status code and a body snippet.
    pub fn http(status: reqwest::StatusCode, body: impl Into<String>) -> Self {
        ClientError::Http {
            status,
            body: body.into(),
        }
    }

    /// Builds an [`ClientError::Api`] from the envelope's error list.
    ///
    /// cPanel sometimes flags a failure without populating `errors`; in that
    /// case a generic message is substituted so the variant always renders
    /// something actionable.
    pub fn api(errors: Vec<String>) -> Self {
        if errors.is_empty() {
            ClientError::Api {
                errors: vec!["cPanel reported failure without details".to_string()],
            }
        } else {
            ClientError::Api { errors }
        }
    }

    /// Returns `true` when the error originated below the HTTP layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}

/// Convenience alias used throughout the client.
pub type Result<T> = std::result::Result<T, ClientError>;
