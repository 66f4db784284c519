//! Field and request validators.
//!
//! [`FieldValidator`] applies an ordered list of rules to one value and
//! reports every failure. The [`Validate`] trait is implemented by request
//! payloads; handlers call [`Validate::validate`] before touching the
//! database.

use super::error::{ValidationErrors, ValidationResult};
use super::rules::ValidationRule;

// ═══════════════════════════════════════════════════════════════════════════════
// Field Validator
// ═══════════════════════════════════════════════════════════════════════════════

/// Applies a chain of rules to a single field value.
pub struct FieldValidator<'a, T: ?Sized> {
    field: &'a str,
    rules: Vec<&'a dyn ValidationRule<T>>,
}

impl<'a, T: ?Sized> FieldValidator<'a, T> {
    pub fn new(field: &'a str) -> Self {
        Self {
            field,
            rules: Vec::new(),
        }
    }

    /// Add a rule to the chain.
    pub fn rule(mut self, rule: &'a dyn ValidationRule<T>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Run every rule, appending failures to `errors`.
    pub fn validate_into(&self, value: &T, errors: &mut ValidationErrors) {
        for rule in &self.rules {
            if let Some(error) = rule.validate(value) {
                errors.add(self.field, error);
            }
        }
    }
}

/// Validate a single value against a chain of rules.
pub fn validate_field<T: ?Sized>(
    field: &str,
    value: &T,
    rules: &[&dyn ValidationRule<T>],
    errors: &mut ValidationErrors,
) {
    for rule in rules {
        if let Some(error) = rule.validate(value) {
            errors.add(field, error);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Validate Trait
// ═══════════════════════════════════════════════════════════════════════════════

/// Implemented by request payloads that can validate themselves.
pub trait Validate {
    /// Collect validation errors for this value.
    fn collect_errors(&self, errors: &mut ValidationErrors);

    /// Validate, returning all accumulated errors on failure.
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = ValidationErrors::new();
        self.collect_errors(&mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::rules::{MaxLength, MinLength, Required};

    struct NameOnly {
        name: String,
    }

    impl Validate for NameOnly {
        fn collect_errors(&self, errors: &mut ValidationErrors) {
            validate_field(
                "name",
                self.name.as_str(),
                &[&Required, &MinLength(2), &MaxLength(100)],
                errors,
            );
        }
    }

    #[test]
    fn test_valid_payload_passes() {
        let payload = NameOnly {
            name: "Иван".to_string(),
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_failures_accumulate() {
        let payload = NameOnly {
            name: String::new(),
        };
        let errors = payload.validate().unwrap_err();
        // Required and MinLength both fire on an empty string.
        assert_eq!(errors.error_count(), 2);
        assert!(errors.has_errors("name"));
    }

    #[test]
    fn test_field_validator_chain() {
        let mut errors = ValidationErrors::new();
        FieldValidator::new("name")
            .rule(&Required)
            .rule(&MinLength(2))
            .validate_into("I", &mut errors);
        assert_eq!(errors.error_count(), 1);
    }
}
