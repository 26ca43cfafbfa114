//! Crate error type.
//!
//! Only load-time failures are errors. Per-week outcomes (unresolved
//! roles, quota exclusions, invariant violations) are reported as data
//! on [`crate::models::WeekAssignment`] and never surface here.

use crate::validation::ValidationError;

/// Fatal errors raised while loading configuration, snapshots or week anchors.
#[derive(Debug, thiserror::Error)]
pub enum RotaError {
    /// Reading a configuration or snapshot file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A week anchor or record date is not `YYYY-MM-DD`
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// A role name did not match any known role
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Configuration failed validation
    #[error("Invalid configuration: {}", summarize(.0))]
    InvalidConfig(Vec<ValidationError>),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_invalid_config_message_lists_all_errors() {
        let err = RotaError::InvalidConfig(vec![
            ValidationError::new(ValidationErrorKind::DuplicateId, "Duplicate person ID: a"),
            ValidationError::new(ValidationErrorKind::UnknownRestriction, "Unknown tag 'x'"),
        ]);
        let text = err.to_string();
        assert!(text.contains("Duplicate person ID: a"));
        assert!(text.contains("Unknown tag 'x'"));
    }

    #[test]
    fn test_date_message() {
        let err = RotaError::InvalidDate("2024/01/07".into());
        assert_eq!(err.to_string(), "Invalid date '2024/01/07': expected YYYY-MM-DD");
    }
}
