//! Input validation framework.
//!
//! All request payloads are validated before they reach the database layer.
//! Failures accumulate per field so a single response reports everything
//! wrong with a payload.
//!
//! # Example
//!
//! ```rust,ignore
//! use hr_admin_core::validation::{validate_field, Validate, ValidationErrors};
//! use hr_admin_core::validation::rules::{EmployeeId, PasswordStrength, Required};
//!
//! struct LoginRequest {
//!     employee_id: String,
//!     password: String,
//! }
//!
//! impl Validate for LoginRequest {
//!     fn collect_errors(&self, errors: &mut ValidationErrors) {
//!         validate_field("employeeId", self.employee_id.as_str(), &[&Required, &EmployeeId], errors);
//!         validate_field("password", self.password.as_str(), &[&Required], errors);
//!     }
//! }
//! ```

pub mod error;
pub mod rules;
pub mod validator;

pub use error::{FieldError, ValidationErrorKind, ValidationErrors, ValidationResult};
pub use validator::{validate_field, FieldValidator, Validate};
