use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Session is not authorized")]
    Unauthorized,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Unexpected response status: {0}")]
    Status(u16),
}

pub type BackendResult<T> = Result<T, BackendError>;

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.status() == Some(reqwest::StatusCode::UNAUTHORIZED) {
            return BackendError::Unauthorized;
        }
        if err.is_decode() {
            return BackendError::Decode(err.to_string());
        }
        match err.status() {
            Some(status) => BackendError::Status(status.as_u16()),
            None => BackendError::Transport(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Decode(err.to_string())
    }
}
