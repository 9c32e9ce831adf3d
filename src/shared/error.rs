use serde::Deserialize;
use thiserror::Error;

/// Error body the backend sends alongside a non-success status.
///
/// Several shapes are seen in the wild: a flat `message` or `error` string,
/// or a JSON:API style `errors` array whose first entry carries a `detail`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ErrorEnvelope {
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .or_else(|| self.errors.iter().find_map(|e| e.detail.as_deref()))
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Request failed with status {status}")]
    Api {
        status: u16,
        body: Option<ErrorEnvelope>,
    },
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Unauthorized)
    }

    /// Message the server attached to the failure, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            AppError::Api {
                body: Some(body), ..
            } => body.message(),
            _ => None,
        }
    }

    /// Text to show in an inline banner: the server's own message when it
    /// sent one, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}
