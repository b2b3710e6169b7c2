use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend responded with status {status}")]
    Status { status: u16, body: serde_json::Value },

    #[error("Malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// 4xx responses are expected outcomes (bad credentials, missing sheet)
    /// and are not worth an error-level log line.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ApiError::Status { status, .. } if (400..500).contains(status))
    }
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Token store unavailable: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Session expired, please log in again")]
    Expired,
}
