use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx answer. `message` is the server's `{"error"}` text when present.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("session file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid response body: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Login answered "not invited": the UI offers self-registration next.
    pub fn is_not_invited(&self) -> bool {
        self.status() == Some(404)
    }
}
