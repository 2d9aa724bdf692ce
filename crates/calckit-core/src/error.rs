use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalcError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Financial impossibility: {0}")]
    FinancialImpossibility(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CalcError {
    /// Shorthand for the most common validation failure.
    pub fn invalid(field: &str, reason: &str) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Validation errors mean the caller supplied bad input; domain errors
    /// mean the input was well-formed but has no meaningful answer.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CalcError::InvalidInput { .. }
            | CalcError::DateError(_)
            | CalcError::SerializationError(_) => ErrorKind::Validation,
            CalcError::FinancialImpossibility(_) | CalcError::DivisionByZero { .. } => {
                ErrorKind::Domain
            }
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Domain,
}

/// Serializable error descriptor handed to UI callers in place of a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

impl From<&CalcError> for ErrorReport {
    fn from(e: &CalcError) -> Self {
        let field = match e {
            CalcError::InvalidInput { field, .. } => Some(field.clone()),
            _ => None,
        };
        ErrorReport {
            kind: e.kind(),
            field,
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            CalcError::invalid("principal", "must be > 0").kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            CalcError::FinancialImpossibility("debt".into()).kind(),
            ErrorKind::Domain
        );
        assert_eq!(
            CalcError::DivisionByZero {
                context: "ratio".into()
            }
            .kind(),
            ErrorKind::Domain
        );
    }

    #[test]
    fn test_report_carries_field() {
        let err = CalcError::invalid("term_months", "Term must be at least 1 month");
        let report = ErrorReport::from(&err);
        assert_eq!(report.field.as_deref(), Some("term_months"));
        assert_eq!(report.kind, ErrorKind::Validation);
        assert!(report.message.contains("Term must be at least 1 month"));
    }

    #[test]
    fn test_report_serializes_snake_case_kind() {
        let err = CalcError::FinancialImpossibility("unaffordable".into());
        let json = serde_json::to_value(ErrorReport::from(&err)).unwrap();
        assert_eq!(json["kind"], "domain");
        assert!(json.get("field").is_none());
    }
}
