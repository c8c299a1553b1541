//! Request validation.
//!
//! Request DTOs implement [`Validate`]; handlers call it before touching any
//! store, and the resulting [`ValidationErrors`] convert into a 422
//! [`InkError`](crate::error::InkError).
//!
//! ```rust,ignore
//! impl Validate for CreateUnitRequest {
//!     fn validate(&self) -> ValidationResult<()> {
//!         let mut errors = ValidationErrors::new();
//!         validate_field("unit_id", &self.unit_id)
//!             .rule(Required)
//!             .rule(MaxLength(64))
//!             .collect_into(&mut errors);
//!         errors.into_result()
//!     }
//! }
//! ```

mod error;

pub use error::{FieldError, ValidationErrorKind, ValidationErrors};

/// Result type for validation.
pub type ValidationResult<T> = std::result::Result<T, ValidationErrors>;

/// Synchronous validation of a request object.
pub trait Validate {
    fn validate(&self) -> ValidationResult<()>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rules
// ═══════════════════════════════════════════════════════════════════════════════

/// A single check against a string value.
pub trait Rule {
    fn check(&self, value: &str) -> Option<ValidationErrorKind>;

    /// Rules after a failing short-circuit rule are skipped.
    fn short_circuits(&self) -> bool {
        false
    }
}

/// Value must be present and not blank.
pub struct Required;

impl Rule for Required {
    fn check(&self, value: &str) -> Option<ValidationErrorKind> {
        value.trim().is_empty().then_some(ValidationErrorKind::Required)
    }

    fn short_circuits(&self) -> bool {
        true
    }
}

/// Maximum length in characters.
pub struct MaxLength(pub usize);

impl Rule for MaxLength {
    fn check(&self, value: &str) -> Option<ValidationErrorKind> {
        let actual = value.chars().count();
        (actual > self.0).then_some(ValidationErrorKind::MaxLength {
            max: self.0,
            actual,
        })
    }
}

/// Value must be one of a fixed set.
pub struct OneOf<'a>(pub &'a [&'a str]);

impl Rule for OneOf<'_> {
    fn check(&self, value: &str) -> Option<ValidationErrorKind> {
        if self.0.contains(&value) {
            None
        } else {
            Some(ValidationErrorKind::NotInSet {
                allowed: self.0.iter().map(|s| s.to_string()).collect(),
            })
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Field Validator
// ═══════════════════════════════════════════════════════════════════════════════

/// Chains rules against one field and records the failures.
pub struct FieldValidator<'a> {
    field: &'static str,
    value: &'a str,
    errors: Vec<ValidationErrorKind>,
    halted: bool,
}

/// Start validating a field.
pub fn validate_field<'a>(field: &'static str, value: &'a str) -> FieldValidator<'a> {
    FieldValidator {
        field,
        value,
        errors: Vec::new(),
        halted: false,
    }
}

impl<'a> FieldValidator<'a> {
    pub fn rule<R: Rule>(mut self, rule: R) -> Self {
        if self.halted {
            return self;
        }
        if let Some(kind) = rule.check(self.value) {
            self.halted = rule.short_circuits();
            self.errors.push(kind);
        }
        self
    }

    pub fn collect_into(self, errors: &mut ValidationErrors) {
        for kind in self.errors {
            errors.add_error(self.field, kind);
        }
    }
}

/// Validate an optional field only when present.
pub fn validate_optional<'a>(
    field: &'static str,
    value: Option<&'a str>,
    build: impl FnOnce(FieldValidator<'a>) -> FieldValidator<'a>,
    errors: &mut ValidationErrors,
) {
    if let Some(value) = value {
        build(validate_field(field, value)).collect_into(errors);
    }
}
