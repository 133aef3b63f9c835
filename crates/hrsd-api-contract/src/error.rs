//! Error types for boundary payload validation and parsing

use thiserror::Error;

/// Errors that can occur during boundary payload validation and parsing
#[derive(Debug, Error)]
pub enum ApiContractError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid request status: {0}")]
    InvalidRequestStatus(String),

    #[error("Invalid request number: {0}")]
    InvalidRequestNumber(String),
}

/// Problem+JSON error response format as per RFC 7807
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub detail: String,
    #[serde(skip_serializing_if = "std::collections::HashMap::is_empty", default)]
    pub errors: std::collections::HashMap<String, Vec<String>>,
}

impl ProblemDetails {
    /// Problem payload describing a rejected boundary payload.
    pub fn invalid_input(error: &ApiContractError) -> Self {
        let mut errors = std::collections::HashMap::new();
        if let ApiContractError::Validation(validation) = error {
            for (field, field_errors) in validation.field_errors() {
                let messages = field_errors
                    .iter()
                    .map(|e| match &e.message {
                        Some(message) => message.to_string(),
                        None => e.code.to_string(),
                    })
                    .collect();
                errors.insert(field.to_string(), messages);
            }
        }
        Self {
            problem_type: "about:blank".to_string(),
            title: "Invalid input".to_string(),
            status: Some(400),
            detail: error.to_string(),
            errors,
        }
    }
}
