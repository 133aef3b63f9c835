//! Core request lifecycle orchestration for the HR Service Desk.
//!
//! This crate owns the domain side of the desk: the request status
//! lifecycle, category routing, upload acceptance, resolved configuration
//! and the boundary operations callers drive. Persistence lives in
//! `hrsd-local-db`; this crate validates at the edges and orchestrates.

pub mod config;
pub mod error;
pub mod request;
pub mod routing;
pub mod service;
pub mod status;
pub mod uploads;

/// Core result type used throughout the desk.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type that encompasses all desk operations.
pub use error::Error;

/// Resolved desk configuration.
pub use config::DeskConfig;

/// Request domain types.
pub use request::{CreatedRequest, NewRequest, Request, RequestDetail};

/// Category routing.
pub use routing::{RoutingTable, DEFAULT_SLA_DAYS};

/// Desk boundary operations.
pub use service::{CategoryCount, DashboardSummary, DeskService, StatusCount};

/// Request status lifecycle.
pub use status::RequestStatus;

/// Attachment metadata and settings rows, shared with the storage layer.
pub use hrsd_local_db::{AttachmentRecord, SettingsRecord};
