//! Core error types for the desk.

/// Core error type for all desk operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Unknown request status: {0}")]
    UnknownStatus(String),

    #[error("Upload rejected: {message}")]
    Upload { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] hrsd_local_db::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new upload rejection error.
    pub fn upload<S: Into<String>>(message: S) -> Self {
        Self::Upload {
            message: message.into(),
        }
    }

    /// Create a new generic error.
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }
}
