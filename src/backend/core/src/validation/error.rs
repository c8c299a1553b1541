//! Validation error types with field-level error support.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{ErrorCode, InkError};

// ═══════════════════════════════════════════════════════════════════════════════
// Validation Error Types
// ═══════════════════════════════════════════════════════════════════════════════

/// The kind of validation error that occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// Field is required but was missing or blank.
    Required,
    /// String length exceeds the maximum.
    MaxLength { max: usize, actual: usize },
    /// Value is not in the allowed set.
    NotInSet { allowed: Vec<String> },
    /// Value conflicts with another field of the same request.
    Conflict { with: String },
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "field is required"),
            Self::MaxLength { max, actual } => {
                write!(f, "must be at most {} characters (got {})", max, actual)
            }
            Self::NotInSet { allowed } => write!(f, "must be one of: {}", allowed.join(", ")),
            Self::Conflict { with } => write!(f, "conflicts with {}", with),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Field Error
// ═══════════════════════════════════════════════════════════════════════════════

/// A single validation error for a specific field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    pub kind: ValidationErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(kind: ValidationErrorKind) -> Self {
        let message = kind.to_string();
        Self { kind, message }
    }

    pub fn with_message(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Validation Errors Collection
// ═══════════════════════════════════════════════════════════════════════════════

/// Validation errors keyed by field name, in field order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationErrors {
    #[serde(flatten)]
    errors: BTreeMap<String, Vec<FieldError>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of errors across all fields.
    pub fn error_count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    pub fn add(&mut self, field: impl Into<String>, error: FieldError) {
        self.errors.entry(field.into()).or_default().push(error);
    }

    pub fn add_error(&mut self, field: impl Into<String>, kind: ValidationErrorKind) {
        self.add(field, FieldError::new(kind));
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn field_errors(&self, field: &str) -> Option<&[FieldError]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, errors) in other.errors {
            self.errors.entry(field).or_default().extend(errors);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<FieldError>)> {
        self.errors.iter()
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, errors) in &self.errors {
            for error in errors {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, error.message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationErrors> for InkError {
    fn from(errors: ValidationErrors) -> Self {
        // A lone missing field keeps its more specific code.
        let only_required = errors
            .errors
            .values()
            .flatten()
            .all(|e| e.kind == ValidationErrorKind::Required);
        let code = if only_required && errors.error_count() == 1 {
            ErrorCode::MissingRequiredField
        } else {
            ErrorCode::ValidationError
        };

        let message = format!("Validation failed: {}", errors);
        let mut error = InkError::new(code, message);
        for (field, field_errors) in &errors.errors {
            let messages: Vec<&str> = field_errors.iter().map(|e| e.message.as_str()).collect();
            error = error.with_context(field.clone(), messages);
        }
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_errors_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add_error("unit_id", ValidationErrorKind::Required);
        errors.add_error(
            "unit_id",
            ValidationErrorKind::MaxLength { max: 64, actual: 70 },
        );
        errors.add_error("ink_code", ValidationErrorKind::Required);

        assert_eq!(errors.error_count(), 3);
        assert_eq!(errors.field_errors("unit_id").map(|e| e.len()), Some(2));
        assert!(errors.has_field("ink_code"));
        assert!(!errors.has_field("status"));
    }

    #[test]
    fn test_single_required_maps_to_missing_field() {
        let mut errors = ValidationErrors::new();
        errors.add_error("printer_id", ValidationErrorKind::Required);

        let error = InkError::from(errors);
        assert_eq!(error.code(), ErrorCode::MissingRequiredField);
        assert!(error.details().context.contains_key("printer_id"));
    }

    #[test]
    fn test_mixed_errors_map_to_validation_error() {
        let mut errors = ValidationErrors::new();
        errors.add_error("unit_id", ValidationErrorKind::Required);
        errors.add_error(
            "status",
            ValidationErrorKind::NotInSet {
                allowed: vec!["IN_STOCK".into(), "INSTALLED".into()],
            },
        );

        let error = InkError::from(errors);
        assert_eq!(error.code(), ErrorCode::ValidationError);
        assert!(error.user_message().contains("status: must be one of"));
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());

        let mut errors = ValidationErrors::new();
        errors.add_error("x", ValidationErrorKind::Required);
        assert!(errors.into_result().is_err());
    }
}
