//! Error types for the assistant client

use hrsd_api_contract::ErrorPayload;
use thiserror::Error;

/// Errors that can occur while talking to the assistant endpoint
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("GROQ_API_KEY not set")]
    MissingApiKey,

    #[error("Empty message")]
    EmptyMessage,

    #[error("HTTP request failed: {0}")]
    Http(#[from] Box<ureq::Error>),

    #[error("Response read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),
}

impl From<ureq::Error> for ChatError {
    fn from(err: ureq::Error) -> Self {
        ChatError::Http(Box::new(err))
    }
}

impl ChatError {
    /// Payload form handed back to the caller instead of a crash.
    pub fn to_payload(&self) -> ErrorPayload {
        let text = match self {
            ChatError::MissingApiKey | ChatError::EmptyMessage => self.to_string(),
            ChatError::Http(err) => format!("HttpError: {}", err),
            ChatError::Io(err) => format!("IoError: {}", err),
            ChatError::Json(err) => format!("JsonError: {}", err),
            ChatError::Url(err) => format!("UrlError: {}", err),
            ChatError::UnexpectedResponse(detail) => {
                format!("UnexpectedResponse: {}", detail)
            }
        };
        ErrorPayload::new(text)
    }
}

/// Result type alias for assistant operations
pub type Result<T> = std::result::Result<T, ChatError>;
