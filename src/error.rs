//! Unified error handling.
//!
//! Every failure surfaced to a client goes through [`AdminError`], which
//! separates the user-facing message from the internal one, carries a stable
//! [`ErrorCode`], and knows its own HTTP status. Authentication failures are
//! deliberately collapsed into a single generic message so a caller cannot
//! distinguish an unknown employee ID from a wrong password or a deactivated
//! account.

use crate::validation::ValidationErrors;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use tracing::{error, warn};

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AdminError>;

// ═══════════════════════════════════════════════════════════════════════════════
// Error Codes
// ═══════════════════════════════════════════════════════════════════════════════

/// Stable machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Authentication (401)
    InvalidCredentials,
    Unauthorized,
    TokenExpired,
    // Authorization (403)
    Forbidden,
    RoleNotAssignable,
    // Client errors (4xx)
    ValidationFailed,
    RecordNotFound,
    DuplicateRecord,
    InvalidFile,
    // Server errors (5xx)
    DatabaseQueryFailed,
    DatabaseConnectionFailed,
    Internal,
}

impl ErrorCode {
    /// HTTP status the code maps to.
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials | Self::Unauthorized | Self::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden | Self::RoleNotAssignable => StatusCode::FORBIDDEN,
            Self::ValidationFailed | Self::InvalidFile => StatusCode::BAD_REQUEST,
            Self::RecordNotFound => StatusCode::NOT_FOUND,
            Self::DuplicateRecord => StatusCode::CONFLICT,
            Self::DatabaseQueryFailed | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::DatabaseConnectionFailed => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Code string as it appears on the wire.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::Forbidden => "FORBIDDEN",
            Self::RoleNotAssignable => "ROLE_NOT_ASSIGNABLE",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::RecordNotFound => "RECORD_NOT_FOUND",
            Self::DuplicateRecord => "DUPLICATE_RECORD",
            Self::InvalidFile => "INVALID_FILE",
            Self::DatabaseQueryFailed => "DATABASE_QUERY_FAILED",
            Self::DatabaseConnectionFailed => "DATABASE_CONNECTION_FAILED",
            Self::Internal => "INTERNAL",
        }
    }

    /// Metric label grouping.
    pub const fn category(&self) -> &'static str {
        match self {
            Self::InvalidCredentials | Self::Unauthorized | Self::TokenExpired => "auth",
            Self::Forbidden | Self::RoleNotAssignable => "authz",
            Self::ValidationFailed | Self::InvalidFile => "validation",
            Self::RecordNotFound | Self::DuplicateRecord => "resource",
            Self::DatabaseQueryFailed | Self::DatabaseConnectionFailed => "database",
            Self::Internal => "internal",
        }
    }

    /// Severity used to pick the log level.
    pub const fn severity(&self) -> ErrorSeverity {
        match self {
            Self::DatabaseQueryFailed | Self::DatabaseConnectionFailed | Self::Internal => {
                ErrorSeverity::Error
            }
            _ => ErrorSeverity::Warn,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Warn,
    Error,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Admin Error
// ═══════════════════════════════════════════════════════════════════════════════

/// The crate-wide error type.
#[derive(Debug)]
pub struct AdminError {
    code: ErrorCode,
    /// Safe to show to callers.
    user_message: Cow<'static, str>,
    /// Operator detail, logged but never serialized.
    internal_message: Option<String>,
    /// Per-field validation errors, present only for `ValidationFailed`.
    field_errors: Option<ValidationErrors>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AdminError {
    pub fn new(code: ErrorCode, user_message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code,
            user_message: user_message.into(),
            internal_message: None,
            field_errors: None,
            source: None,
        }
    }

    /// Attach operator-only detail.
    pub fn with_internal(mut self, message: impl Into<String>) -> Self {
        self.internal_message = Some(message.into());
        self
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        self.field_errors.as_ref()
    }

    // ───────────────────────────────────────────────────────────────────────
    // Constructors for common failures
    // ───────────────────────────────────────────────────────────────────────

    /// The one message every credential failure collapses into.
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials, "Invalid credentials")
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, "Authentication required").with_internal(detail)
    }

    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired, "Session expired")
    }

    pub fn forbidden() -> Self {
        Self::new(ErrorCode::Forbidden, "Insufficient permissions")
    }

    pub fn role_not_assignable(role: impl fmt::Display) -> Self {
        Self::new(ErrorCode::RoleNotAssignable, "Insufficient permissions to assign this role")
            .with_internal(format!("actor cannot assign role {role}"))
    }

    pub fn validation(errors: ValidationErrors) -> Self {
        let mut err = Self::new(ErrorCode::ValidationFailed, "Validation failed");
        err.field_errors = Some(errors);
        err
    }

    pub fn not_found(resource: &str) -> Self {
        Self::new(ErrorCode::RecordNotFound, format!("{resource} not found"))
    }

    pub fn duplicate(resource: &str) -> Self {
        Self::new(ErrorCode::DuplicateRecord, format!("{resource} already exists"))
    }

    pub fn invalid_file(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCode::InvalidFile, message)
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, "Internal server error").with_internal(detail)
    }

    // ───────────────────────────────────────────────────────────────────────
    // Observability
    // ───────────────────────────────────────────────────────────────────────

    /// Log at the severity the code dictates and bump the error counter.
    pub fn log(&self) {
        let internal = self.internal_message.as_deref().unwrap_or("");
        match self.code.severity() {
            ErrorSeverity::Error => error!(
                code = self.code.as_str(),
                internal,
                source = ?self.source,
                "{}",
                self.user_message
            ),
            ErrorSeverity::Warn => warn!(
                code = self.code.as_str(),
                internal,
                "{}",
                self.user_message
            ),
        }
        counter!(
            "hr_admin_errors_total",
            "code" => self.code.as_str(),
            "category" => self.code.category(),
        )
        .increment(1);
    }
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.user_message)
    }
}

impl std::error::Error for AdminError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Conversions
// ═══════════════════════════════════════════════════════════════════════════════

impl From<ValidationErrors> for AdminError {
    fn from(errors: ValidationErrors) -> Self {
        Self::validation(errors)
    }
}

impl From<sqlx::Error> for AdminError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::not_found("Record").with_source(err),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::duplicate("Record")
                    .with_internal(db_err.message().to_string())
                    .with_source(err)
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                Self::new(ErrorCode::DatabaseConnectionFailed, "Service temporarily unavailable")
                    .with_internal(err.to_string())
                    .with_source(err)
            }
            _ => Self::new(ErrorCode::DatabaseQueryFailed, "Internal server error")
                .with_internal(err.to_string())
                .with_source(err),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AdminError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::ExpiredSignature => Self::token_expired(),
            _ => Self::unauthorized(format!("token rejected: {err}")),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HTTP Response
// ═══════════════════════════════════════════════════════════════════════════════

/// Wire format for error responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<ValidationErrors>,
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.code.http_status();
        let body = ErrorResponse {
            success: false,
            error: ErrorBody {
                code: self.code,
                message: self.user_message.into_owned(),
                fields: self.field_errors,
            },
        };
        (status, Json(body)).into_response()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ErrorCode::InvalidCredentials.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ErrorCode::Forbidden.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ErrorCode::RoleNotAssignable.http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ErrorCode::RecordNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::DuplicateRecord.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::DatabaseConnectionFailed.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_credential_failures_share_one_message() {
        // The constructor is the only path to INVALID_CREDENTIALS, so every
        // failure mode carries an identical body.
        let a = AdminError::invalid_credentials();
        let b = AdminError::invalid_credentials();
        assert_eq!(a.user_message(), b.user_message());
        assert_eq!(a.user_message(), "Invalid credentials");
    }

    #[test]
    fn test_internal_message_not_serialized() {
        let err = AdminError::invalid_credentials().with_internal("unknown employee 1234567");
        let body = ErrorResponse {
            success: false,
            error: ErrorBody {
                code: err.code(),
                message: err.user_message().to_string(),
                fields: None,
            },
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("1234567"));
        assert!(json.contains("INVALID_CREDENTIALS"));
    }

    #[test]
    fn test_validation_error_carries_fields() {
        let mut errors = ValidationErrors::new();
        errors.add_required("employeeId");
        let err = AdminError::validation(errors);
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert!(err.field_errors().unwrap().has_errors("employeeId"));
    }

    #[test]
    fn test_sqlx_row_not_found_maps_to_404() {
        let err: AdminError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.code(), ErrorCode::RecordNotFound);
    }
}
