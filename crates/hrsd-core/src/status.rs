//! Request status lifecycle.

use serde::{Deserialize, Serialize};

/// Status of a request in its lifecycle.
///
/// The set is closed: status strings are validated against it on every
/// write, and anything else is rejected instead of being stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Request has been submitted and not yet picked up.
    Submitted,
    /// A team is working on the request.
    #[serde(rename = "In Progress")]
    InProgress,
    /// Request was resolved.
    Completed,
    /// Request was declined.
    Rejected,
}

impl RequestStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [RequestStatus; 4] = [
        RequestStatus::Submitted,
        RequestStatus::InProgress,
        RequestStatus::Completed,
        RequestStatus::Rejected,
    ];

    /// The stored string form of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Submitted => "Submitted",
            RequestStatus::InProgress => "In Progress",
            RequestStatus::Completed => "Completed",
            RequestStatus::Rejected => "Rejected",
        }
    }

    /// Parse a stored status string.
    pub fn parse(s: &str) -> crate::Result<Self> {
        match s {
            "Submitted" => Ok(RequestStatus::Submitted),
            "In Progress" => Ok(RequestStatus::InProgress),
            "Completed" => Ok(RequestStatus::Completed),
            "Rejected" => Ok(RequestStatus::Rejected),
            other => Err(crate::Error::UnknownStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
