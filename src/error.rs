use thiserror::Error;

/// Outcome of a failed token refresh.
///
/// Cloneable so one failure can be handed to every request that was
/// queued behind the refresh.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct RefreshFailure {
    pub status: Option<u16>,
    pub message: String,
}

impl RefreshFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },
    #[error("Token refresh failed: {0}")]
    RefreshFailed(RefreshFailure),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status of the response that caused this error, if one arrived.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::RefreshFailed(failure) => failure.status,
            ClientError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Api { status: 401, .. })
    }
}

impl From<RefreshFailure> for ClientError {
    fn from(failure: RefreshFailure) -> Self {
        ClientError::RefreshFailed(failure)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
