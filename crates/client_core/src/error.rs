use thiserror::Error;

/// Failure of a single collaborator exchange, normalized for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    #[error("the collaborator endpoint is not configured")]
    NotConfigured,
    #[error("invalid collaborator endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("network error: {0}")]
    Transport(String),
    #[error("The server responded with status: {0}")]
    Status(u16),
    #[error("{0}")]
    Application(String),
    #[error("unexpected response from server: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for CollaboratorError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            CollaboratorError::Malformed(value.to_string())
        } else if let Some(status) = value.status() {
            CollaboratorError::Status(status.as_u16())
        } else {
            CollaboratorError::Transport(value.to_string())
        }
    }
}
