//! Payload types exchanged at the desk boundary

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Status values a request may carry across the boundary.
pub const REQUEST_STATUSES: &[&str] = &["Submitted", "In Progress", "Completed", "Rejected"];

/// A new request submitted by an employee or on their behalf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SubmitRequestInput {
    /// Preferred request number. Leave empty to let the desk assign one.
    #[serde(default)]
    pub request_no: String,
    #[validate(length(min = 1, message = "Employee id cannot be empty"))]
    pub employee_id: String,
    #[validate(length(min = 1, message = "Employee name cannot be empty"))]
    pub employee_name: String,
    #[serde(default)]
    pub cluster: String,
    #[serde(default)]
    pub department: String,
    #[validate(length(min = 1, message = "Category cannot be empty"))]
    pub category: String,
    #[serde(default)]
    pub request_type: String,
    #[serde(default)]
    pub details: String,
    /// Working days until the request is due. Defaults to the category SLA.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<i64>,
}

/// A status change for an existing request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct UpdateStatusInput {
    #[validate(length(min = 1, message = "Request number cannot be empty"))]
    pub request_no: String,
    #[validate(length(min = 1, message = "Status cannot be empty"))]
    pub status: String,
    /// Team or person now holding the request.
    #[serde(default)]
    pub assignee: String,
}

/// Desk-wide settings applied from the admin surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SettingsInput {
    #[validate(length(min = 1, message = "Company name cannot be empty"))]
    pub company_name: String,
    /// Path of the active store. Empty keeps the bootstrap store.
    #[serde(default)]
    pub company_db_path: String,
    /// Directory receiving uploaded attachments. Empty keeps the default.
    #[serde(default)]
    pub upload_folder: String,
}

/// A question for the desk assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ChatInput {
    #[validate(length(min = 1, message = "Message cannot be empty"))]
    pub message: String,
    /// Request number the question is about, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_no: Option<String>,
}

/// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitRequestResponse {
    pub request_no: String,
    pub status: String,
    pub assignee: String,
    pub duration_days: i64,
}

/// Answer produced by the desk assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    /// Model that produced the reply.
    pub model: String,
}

/// Structured failure payload returned instead of a crash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
}

impl ErrorPayload {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
