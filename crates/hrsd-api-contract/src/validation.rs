//! Validation helpers for boundary payload types

use crate::error::ApiContractError;
use crate::types::*;
use validator::Validate;

/// Validate a request submission payload
pub fn validate_submit_request(input: &SubmitRequestInput) -> Result<(), ApiContractError> {
    input.validate()?;

    // Request numbers end up in attachment file names, so path
    // separators are rejected outright rather than sanitized away.
    if input.request_no.contains(['/', '\\']) {
        return Err(ApiContractError::InvalidRequestNumber(
            input.request_no.clone(),
        ));
    }

    Ok(())
}

/// Validate a status update payload
pub fn validate_update_status(input: &UpdateStatusInput) -> Result<(), ApiContractError> {
    input.validate()?;

    if !REQUEST_STATUSES.contains(&input.status.as_str()) {
        return Err(ApiContractError::InvalidRequestStatus(input.status.clone()));
    }

    Ok(())
}

/// Validate a settings payload
pub fn validate_settings(input: &SettingsInput) -> Result<(), ApiContractError> {
    input.validate()?;
    Ok(())
}

/// Validate an assistant chat payload
pub fn validate_chat_input(input: &ChatInput) -> Result<(), ApiContractError> {
    input.validate()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProblemDetails;
    use crate::types::*;

    fn submission() -> SubmitRequestInput {
        SubmitRequestInput {
            request_no: String::new(),
            employee_id: "E-1001".to_string(),
            employee_name: "Sara Al-Qahtani".to_string(),
            cluster: "Riyadh".to_string(),
            department: "Finance".to_string(),
            category: "الدعم التقني".to_string(),
            request_type: "Access".to_string(),
            details: "VPN access for the new laptop".to_string(),
            duration_days: None,
        }
    }

    #[test]
    fn test_validate_submit_request_valid() {
        assert!(validate_submit_request(&submission()).is_ok());
    }

    #[test]
    fn test_validate_submit_request_empty_employee_id() {
        let input = SubmitRequestInput {
            employee_id: "".to_string(),
            ..submission()
        };

        assert!(validate_submit_request(&input).is_err());
    }

    #[test]
    fn test_validate_submit_request_rejects_path_separators() {
        let input = SubmitRequestInput {
            request_no: "42/../../etc".to_string(),
            ..submission()
        };

        let err = validate_submit_request(&input).expect_err("separator should be rejected");
        assert!(matches!(err, ApiContractError::InvalidRequestNumber(_)));
    }

    #[test]
    fn test_validate_update_status_known_statuses() {
        for status in REQUEST_STATUSES {
            let input = UpdateStatusInput {
                request_no: "42".to_string(),
                status: status.to_string(),
                assignee: "IT Support".to_string(),
            };

            assert!(validate_update_status(&input).is_ok());
        }
    }

    #[test]
    fn test_validate_update_status_unknown_status() {
        let input = UpdateStatusInput {
            request_no: "42".to_string(),
            status: "Escalated".to_string(),
            assignee: "".to_string(),
        };

        let err = validate_update_status(&input).expect_err("unknown status should be rejected");
        assert!(matches!(err, ApiContractError::InvalidRequestStatus(_)));
    }

    #[test]
    fn test_validate_chat_input_empty_message() {
        let input = ChatInput {
            message: "".to_string(),
            request_no: None,
        };

        assert!(validate_chat_input(&input).is_err());
    }

    #[test]
    fn test_problem_details_carries_field_errors() {
        let input = SubmitRequestInput {
            employee_id: "".to_string(),
            category: "".to_string(),
            ..submission()
        };

        let err = validate_submit_request(&input).expect_err("two fields are empty");
        let problem = ProblemDetails::invalid_input(&err);

        assert_eq!(problem.status, Some(400));
        assert!(problem.errors.contains_key("employee_id"));
        assert!(problem.errors.contains_key("category"));

        let json = serde_json::to_value(&problem).expect("problem serializes");
        assert_eq!(json["type"], "about:blank");
        assert_eq!(json["title"], "Invalid input");
    }
}
