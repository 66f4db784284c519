//! Validation error types with field-level error support.
//!
//! Failures are collected per field path, never fail-fast: a rejected
//! payload reports every offending field in one response.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════════════
// Validation Error Kinds
// ═══════════════════════════════════════════════════════════════════════════════

/// The kind of validation error that occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// Field is required but was missing or empty.
    Required,
    /// String length is below the minimum.
    MinLength { min: usize, actual: usize },
    /// String length exceeds the maximum.
    MaxLength { max: usize, actual: usize },
    /// String length must be exact.
    ExactLength { expected: usize, actual: usize },
    /// Value does not match the expected email format.
    InvalidEmail,
    /// Value does not match the expected URL format.
    InvalidUrl,
    /// Value does not match the expected pattern.
    Pattern { pattern: String },
    /// Value is not in the allowed set.
    NotInSet { allowed: Vec<String> },
    /// Custom validation failed.
    Custom { code: String },
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "field is required"),
            Self::MinLength { min, actual } => {
                write!(f, "must be at least {} characters (got {})", min, actual)
            }
            Self::MaxLength { max, actual } => {
                write!(f, "must be at most {} characters (got {})", max, actual)
            }
            Self::ExactLength { expected, actual } => {
                write!(f, "must be exactly {} characters (got {})", expected, actual)
            }
            Self::InvalidEmail => write!(f, "must be a valid email address"),
            Self::InvalidUrl => write!(f, "must be a valid URL"),
            Self::Pattern { pattern } => write!(f, "must match pattern: {}", pattern),
            Self::NotInSet { allowed } => {
                write!(f, "must be one of: {}", allowed.join(", "))
            }
            Self::Custom { code } => write!(f, "validation failed: {}", code),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Field Error
// ═══════════════════════════════════════════════════════════════════════════════

/// A single validation error for a specific field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    /// The kind of validation error.
    pub kind: ValidationErrorKind,
    /// Human-readable error message.
    pub message: String,
}

impl FieldError {
    /// Create a new field error with a message derived from the kind.
    pub fn new(kind: ValidationErrorKind) -> Self {
        let message = kind.to_string();
        Self { kind, message }
    }

    /// Create a new field error with a custom message.
    pub fn with_message(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Validation Errors Collection
// ═══════════════════════════════════════════════════════════════════════════════

/// A collection of validation errors organized by field name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationErrors {
    #[serde(flatten)]
    errors: HashMap<String, Vec<FieldError>>,
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
        self.errors.values().map(|v| v.len()).sum()
    }

    /// Number of fields with at least one error.
    pub fn field_count(&self) -> usize {
        self.errors.len()
    }

    /// Add an error for a specific field.
    pub fn add(&mut self, field: impl Into<String>, error: FieldError) {
        self.errors.entry(field.into()).or_default().push(error);
    }

    /// Add an error with just the kind (auto-generates the message).
    pub fn add_error(&mut self, field: impl Into<String>, kind: ValidationErrorKind) {
        self.add(field, FieldError::new(kind));
    }

    /// Add a required-field error.
    pub fn add_required(&mut self, field: impl Into<String>) {
        self.add_error(field, ValidationErrorKind::Required);
    }

    pub fn get(&self, field: &str) -> Option<&Vec<FieldError>> {
        self.errors.get(field)
    }

    pub fn has_errors(&self, field: &str) -> bool {
        self.errors.get(field).map(|v| !v.is_empty()).unwrap_or(false)
    }

    /// Merge another collection into this one.
    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, errors) in other.errors {
            self.errors.entry(field).or_default().extend(errors);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<FieldError>)> {
        self.errors.iter()
    }

    /// Flat list of "field: message" strings, useful for single-line reports
    /// such as per-row import errors.
    pub fn to_flat_messages(&self) -> Vec<String> {
        let mut messages: Vec<String> = self
            .errors
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| format!("{}: {}", field, e.message))
            })
            .collect();
        messages.sort();
        messages
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_flat_messages().join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Result type for validation operations.
pub type ValidationResult<T> = std::result::Result<T, ValidationErrors>;

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_display() {
        let error = FieldError::new(ValidationErrorKind::Required);
        assert_eq!(error.to_string(), "field is required");

        let error = FieldError::new(ValidationErrorKind::ExactLength {
            expected: 7,
            actual: 6,
        });
        assert_eq!(error.to_string(), "must be exactly 7 characters (got 6)");
    }

    #[test]
    fn test_add_and_query() {
        let mut errors = ValidationErrors::new();
        errors.add_required("employeeId");
        errors.add_error("email", ValidationErrorKind::InvalidEmail);

        assert_eq!(errors.field_count(), 2);
        assert_eq!(errors.error_count(), 2);
        assert!(errors.has_errors("employeeId"));
        assert!(!errors.has_errors("password"));
    }

    #[test]
    fn test_multiple_errors_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add_required("password");
        errors.add_error("password", ValidationErrorKind::MinLength { min: 8, actual: 0 });
        assert_eq!(errors.field_count(), 1);
        assert_eq!(errors.error_count(), 2);
    }

    #[test]
    fn test_merge_overlapping_fields() {
        let mut a = ValidationErrors::new();
        a.add_required("name");
        let mut b = ValidationErrors::new();
        b.add_error("name", ValidationErrorKind::MinLength { min: 2, actual: 0 });
        a.merge(b);
        assert_eq!(a.field_count(), 1);
        assert_eq!(a.error_count(), 2);
    }

    #[test]
    fn test_flat_messages_name_every_field() {
        let mut errors = ValidationErrors::new();
        errors.add_required("firstName");
        errors.add_error("email", ValidationErrorKind::InvalidEmail);
        let messages = errors.to_flat_messages();
        assert_eq!(messages.len(), 2);
        assert!(messages.iter().any(|m| m.starts_with("firstName:")));
        assert!(messages.iter().any(|m| m.starts_with("email:")));
    }
}
