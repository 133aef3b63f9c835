//! Request domain types.

use serde::{Deserialize, Serialize};

use crate::status::RequestStatus;
use hrsd_local_db::{AttachmentRecord, RequestRecord};

/// A tracked employee request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub id: i64,
    pub request_no: String,
    pub employee_id: String,
    pub employee_name: String,
    pub cluster: String,
    pub department: String,
    pub category: String,
    pub request_type: String,
    pub details: String,
    pub status: RequestStatus,
    pub assignee: String,
    pub duration_days: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Request {
    /// Convert a stored record into the domain form.
    pub fn from_record(record: &RequestRecord) -> crate::Result<Self> {
        Ok(Self {
            id: record.id,
            request_no: record.request_no.clone(),
            employee_id: record.employee_id.clone(),
            employee_name: record.employee_name.clone(),
            cluster: record.cluster.clone(),
            department: record.department.clone(),
            category: record.category.clone(),
            request_type: record.request_type.clone(),
            details: record.details.clone(),
            status: RequestStatus::parse(&record.status)?,
            assignee: record.assignee.clone(),
            duration_days: record.duration_days,
            created_at: chrono::DateTime::parse_from_rfc3339(&record.created_at)
                .map_err(|e| crate::Error::generic(format!("Invalid created_at: {}", e)))?
                .with_timezone(&chrono::Utc),
            updated_at: chrono::DateTime::parse_from_rfc3339(&record.updated_at)
                .map_err(|e| crate::Error::generic(format!("Invalid updated_at: {}", e)))?
                .with_timezone(&chrono::Utc),
        })
    }

    /// When the request is expected to be resolved, based on its duration.
    pub fn due_date(&self) -> chrono::NaiveDate {
        (self.created_at + chrono::Duration::days(self.duration_days)).date_naive()
    }
}

/// Input for creating a request.
///
/// `suggested_no` may be empty; the allocator then picks the next number.
/// `duration_days` left unset falls back to the category's routed duration.
#[derive(Debug, Clone, Default)]
pub struct NewRequest {
    pub suggested_no: String,
    pub employee_id: String,
    pub employee_name: String,
    pub cluster: String,
    pub department: String,
    pub category: String,
    pub request_type: String,
    pub details: String,
    pub duration_days: Option<i64>,
}

/// Identifiers of a freshly created request.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedRequest {
    /// The external number actually assigned, which may differ from the
    /// suggestion.
    pub request_no: String,
    /// The internal rowid attachments are recorded against.
    pub id: i64,
}

/// A request together with its recorded attachments.
#[derive(Debug, Clone, Serialize)]
pub struct RequestDetail {
    pub request: Request,
    pub attachments: Vec<AttachmentRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> RequestRecord {
        RequestRecord {
            id: 7,
            request_no: "12".to_string(),
            employee_id: "E9".to_string(),
            employee_name: "Sara".to_string(),
            cluster: "Jeddah".to_string(),
            department: "HR".to_string(),
            category: "التأمين الطبي".to_string(),
            request_type: "Dependent card".to_string(),
            details: String::new(),
            status: "In Progress".to_string(),
            assignee: "Benefits Team".to_string(),
            duration_days: 3,
            created_at: "2024-03-04T10:30:00+00:00".to_string(),
            updated_at: "2024-03-05T08:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn record_converts_to_domain_form() {
        let request = Request::from_record(&record()).expect("convert");
        assert_eq!(request.status, RequestStatus::InProgress);
        assert_eq!(request.due_date().to_string(), "2024-03-07");
    }

    #[test]
    fn bad_status_in_a_record_is_an_error() {
        let mut bad = record();
        bad.status = "Escalated".to_string();
        assert!(Request::from_record(&bad).is_err());
    }
}
