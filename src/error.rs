use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Transport(String),
    #[error("HTTP error! status: {status}")]
    Status {
        status: u16,
    },
    #[error("invalid response from server: {0}")]
    MalformedReply(String),
    #[error("upload of '{file}' rejected: {reason}")]
    UploadRejected {
        file: String,
        reason: String,
    },
    #[error("file error: {0}")]
    Io(String),
    #[error("not a file path: {0}")]
    InvalidPath(String),
}

impl From<reqwest::Error> for SessionError {
    fn from(err: reqwest::Error) -> Self {
        SessionError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::MalformedReply(err.to_string())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid backend URL '{url}': {reason}")]
    InvalidBackendUrl {
        url: String,
        reason: String,
    },
    #[error("invalid {name} band: {min}..={max}")]
    InvalidBand {
        name: &'static str,
        min: u64,
        max: u64,
    },
}
