//! HR Service Desk boundary contract types and validation
//!
//! This crate defines the payload shapes accepted from and returned to
//! callers of the service desk, together with their validation rules.
//! These types are shared between the CLI surface and any future
//! transport that fronts the desk.

pub mod error;
pub mod types;
pub mod validation;

pub use error::*;
pub use types::*;
