//! Reusable validation rules.
//!
//! Each rule is a zero-or-small-state struct implementing [`ValidationRule`]
//! for the value types it applies to. Rules on `Option<String>` pass when the
//! value is `None`; pair them with [`Required`] when the field is mandatory.

use super::error::{FieldError, ValidationErrorKind};
use regex::Regex;
use std::sync::LazyLock;

// ═══════════════════════════════════════════════════════════════════════════════
// Compiled Patterns
// ═══════════════════════════════════════════════════════════════════════════════

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .unwrap_or_else(|e| panic!("invalid email regex: {e}"))
});

static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[^\s/$.?#].[^\s]*$")
        .unwrap_or_else(|e| panic!("invalid url regex: {e}"))
});

// ═══════════════════════════════════════════════════════════════════════════════
// Rule Trait
// ═══════════════════════════════════════════════════════════════════════════════

/// A validation rule for a value of type `T`.
pub trait ValidationRule<T: ?Sized>: Send + Sync {
    /// Validate the value, returning an error on failure.
    fn validate(&self, value: &T) -> Option<FieldError>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// Generic Rules
// ═══════════════════════════════════════════════════════════════════════════════

/// Field must be present and non-empty.
pub struct Required;

impl ValidationRule<str> for Required {
    fn validate(&self, value: &str) -> Option<FieldError> {
        if value.trim().is_empty() {
            Some(FieldError::new(ValidationErrorKind::Required))
        } else {
            None
        }
    }
}

impl ValidationRule<Option<String>> for Required {
    fn validate(&self, value: &Option<String>) -> Option<FieldError> {
        match value {
            Some(s) if !s.trim().is_empty() => None,
            _ => Some(FieldError::new(ValidationErrorKind::Required)),
        }
    }
}

/// Minimum character length (counted in chars, not bytes).
pub struct MinLength(pub usize);

impl ValidationRule<str> for MinLength {
    fn validate(&self, value: &str) -> Option<FieldError> {
        let actual = value.chars().count();
        if actual < self.0 {
            Some(FieldError::new(ValidationErrorKind::MinLength {
                min: self.0,
                actual,
            }))
        } else {
            None
        }
    }
}

impl ValidationRule<Option<String>> for MinLength {
    fn validate(&self, value: &Option<String>) -> Option<FieldError> {
        value.as_deref().and_then(|s| ValidationRule::<str>::validate(self, s))
    }
}

/// Maximum character length.
pub struct MaxLength(pub usize);

impl ValidationRule<str> for MaxLength {
    fn validate(&self, value: &str) -> Option<FieldError> {
        let actual = value.chars().count();
        if actual > self.0 {
            Some(FieldError::new(ValidationErrorKind::MaxLength {
                max: self.0,
                actual,
            }))
        } else {
            None
        }
    }
}

impl ValidationRule<Option<String>> for MaxLength {
    fn validate(&self, value: &Option<String>) -> Option<FieldError> {
        value.as_deref().and_then(|s| ValidationRule::<str>::validate(self, s))
    }
}

/// Value must be a syntactically valid email address.
pub struct Email;

impl ValidationRule<str> for Email {
    fn validate(&self, value: &str) -> Option<FieldError> {
        if EMAIL_REGEX.is_match(value) {
            None
        } else {
            Some(FieldError::new(ValidationErrorKind::InvalidEmail))
        }
    }
}

impl ValidationRule<Option<String>> for Email {
    fn validate(&self, value: &Option<String>) -> Option<FieldError> {
        match value.as_deref() {
            // An explicit empty string means "no address" and is not an error.
            Some(s) if !s.is_empty() => ValidationRule::<str>::validate(self, s),
            _ => None,
        }
    }
}

/// Value must be an http(s) URL.
pub struct Url;

impl ValidationRule<str> for Url {
    fn validate(&self, value: &str) -> Option<FieldError> {
        if URL_REGEX.is_match(value) {
            None
        } else {
            Some(FieldError::new(ValidationErrorKind::InvalidUrl))
        }
    }
}

impl ValidationRule<Option<String>> for Url {
    fn validate(&self, value: &Option<String>) -> Option<FieldError> {
        value.as_deref().and_then(|s| ValidationRule::<str>::validate(self, s))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Domain Rules
// ═══════════════════════════════════════════════════════════════════════════════

/// Personnel number format: exactly 7 ASCII digits.
pub struct EmployeeId;

impl ValidationRule<str> for EmployeeId {
    fn validate(&self, value: &str) -> Option<FieldError> {
        let actual = value.chars().count();
        if actual != 7 {
            return Some(FieldError::with_message(
                ValidationErrorKind::ExactLength { expected: 7, actual },
                "employee ID must be exactly 7 digits",
            ));
        }
        if !value.bytes().all(|b| b.is_ascii_digit()) {
            return Some(FieldError::with_message(
                ValidationErrorKind::Pattern {
                    pattern: r"^\d{7}$".to_string(),
                },
                "employee ID must contain only digits",
            ));
        }
        None
    }
}

impl ValidationRule<Option<String>> for EmployeeId {
    fn validate(&self, value: &Option<String>) -> Option<FieldError> {
        value.as_deref().and_then(|s| ValidationRule::<str>::validate(self, s))
    }
}

/// Password policy: at least `min_length` characters with an uppercase
/// letter, a lowercase letter and a digit.
pub struct PasswordStrength {
    pub min_length: usize,
}

impl PasswordStrength {
    pub const DEFAULT_MIN_LENGTH: usize = 8;

    pub fn standard() -> Self {
        Self {
            min_length: Self::DEFAULT_MIN_LENGTH,
        }
    }
}

impl ValidationRule<str> for PasswordStrength {
    fn validate(&self, value: &str) -> Option<FieldError> {
        let actual = value.chars().count();
        if actual < self.min_length {
            return Some(FieldError::with_message(
                ValidationErrorKind::MinLength {
                    min: self.min_length,
                    actual,
                },
                format!("password must be at least {} characters", self.min_length),
            ));
        }
        if !value.chars().any(|c| c.is_uppercase()) {
            return Some(FieldError::with_message(
                ValidationErrorKind::Custom {
                    code: "password_uppercase".to_string(),
                },
                "password must contain an uppercase letter",
            ));
        }
        if !value.chars().any(|c| c.is_lowercase()) {
            return Some(FieldError::with_message(
                ValidationErrorKind::Custom {
                    code: "password_lowercase".to_string(),
                },
                "password must contain a lowercase letter",
            ));
        }
        if !value.chars().any(|c| c.is_ascii_digit()) {
            return Some(FieldError::with_message(
                ValidationErrorKind::Custom {
                    code: "password_digit".to_string(),
                },
                "password must contain a digit",
            ));
        }
        None
    }
}

impl ValidationRule<Option<String>> for PasswordStrength {
    fn validate(&self, value: &Option<String>) -> Option<FieldError> {
        value.as_deref().and_then(|s| ValidationRule::<str>::validate(self, s))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn fails(rule: &impl ValidationRule<str>, value: &str) -> bool {
        rule.validate(value).is_some()
    }

    #[test]
    fn test_required() {
        assert!(fails(&Required, ""));
        assert!(fails(&Required, "   "));
        assert!(!fails(&Required, "x"));
    }

    #[test]
    fn test_required_option() {
        let rule = Required;
        assert!(ValidationRule::<Option<String>>::validate(&rule, &None).is_some());
        assert!(
            ValidationRule::<Option<String>>::validate(&rule, &Some("x".to_string())).is_none()
        );
    }

    #[test]
    fn test_length_rules_count_chars() {
        // Cyrillic names are multi-byte; limits are per character.
        assert!(!fails(&MinLength(2), "Ив"));
        assert!(fails(&MinLength(3), "Ив"));
        assert!(!fails(&MaxLength(4), "Иван"));
    }

    #[test]
    fn test_email() {
        assert!(!fails(&Email, "user@example.com"));
        assert!(fails(&Email, "not-an-email"));
        assert!(fails(&Email, "user@"));
    }

    #[test]
    fn test_url() {
        assert!(!fails(&Url, "https://provider.example.com/catalog"));
        assert!(fails(&Url, "ftp://provider.example.com"));
        assert!(fails(&Url, "provider"));
    }

    #[test]
    fn test_employee_id() {
        assert!(!fails(&EmployeeId, "1234567"));
        assert!(fails(&EmployeeId, "123456"));
        assert!(fails(&EmployeeId, "12345678"));
        assert!(fails(&EmployeeId, "12a4567"));
        assert!(fails(&EmployeeId, "１２３４５６７")); // full-width digits
    }

    #[test]
    fn test_password_strength() {
        let rule = PasswordStrength::standard();
        assert!(!fails(&rule, "Passw0rd"));
        assert!(fails(&rule, "Pass1")); // too short
        assert!(fails(&rule, "password1")); // no uppercase
        assert!(fails(&rule, "PASSWORD1")); // no lowercase
        assert!(fails(&rule, "Password")); // no digit
    }

    #[test]
    fn test_optional_rules_skip_none() {
        let rule = Email;
        assert!(ValidationRule::<Option<String>>::validate(&rule, &None).is_none());
    }

    #[test]
    fn test_optional_email_accepts_empty_string() {
        let rule = Email;
        assert!(
            ValidationRule::<Option<String>>::validate(&rule, &Some(String::new())).is_none()
        );
        assert!(
            ValidationRule::<Option<String>>::validate(&rule, &Some("bad".to_string())).is_some()
        );
    }
}
