//! Client error type

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-2xx response; `message` is the server's `{"error": ...}` text when present
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Server-side or network trouble worth retrying later
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Api { status, .. } => *status >= 500,
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Decode(_) | Self::Config(_) => false,
        }
    }
}
