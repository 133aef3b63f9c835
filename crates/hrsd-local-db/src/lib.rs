//! SQLite storage for local HR Service Desk state.
//!
//! This crate provides persistent storage for employee requests, their
//! attachments and the desk settings using SQLite as the backing database.
//! Stores are converged onto the current schema by the reconciler in
//! [`reconcile`] rather than by versioned migration scripts.

pub mod allocator;
pub mod connection;
pub mod models;
pub mod reconcile;
pub mod schema;

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for database operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Schema reconciliation error: {message}")]
    Reconcile { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic database error: {0}")]
    Generic(String),
}

impl Error {
    /// Create a new reconciliation error.
    pub fn reconcile<S: Into<String>>(message: S) -> Self {
        Self::Reconcile {
            message: message.into(),
        }
    }

    /// Create a new generic database error.
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }
}

/// Database connection and management.
pub use connection::Database;

/// Request number allocation.
pub use allocator::{allocate_request_no, is_unique_violation};

/// Database models and operations.
pub use models::{
    AttachmentRecord, AttachmentStore, RequestRecord, RequestStore, SettingsRecord, SettingsStore,
};

/// Schema reconciliation.
pub use reconcile::{Reconciler, SchemaCapabilities};

/// Schema definitions and constants.
pub use schema::*;
