//! # HR Admin Core
//!
//! Backend for an internal HR administration service: role-gated CRUD over
//! users, training courses, and course providers, with credential
//! authentication and spreadsheet bulk import.
//!
//! ## Architecture
//!
//! - **RBAC**: six-role hierarchy with an explicit assignment table and
//!   pure permission predicates
//! - **Auth**: Argon2id credential checks with collapsed failures, JWT
//!   sessions with forced invalidation
//! - **API**: axum handlers under `/api/v1`, uniform response envelope
//! - **Import**: `.xlsx`/`.xls` parsing with per-row error accumulation
//! - **Validation**: field-level rules with accumulated per-field errors
//! - **Observability**: structured tracing and Prometheus metrics

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod middleware;
pub mod observability;
pub mod rbac;
pub mod validation;

pub use error::{AdminError, ErrorCode, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::auth::{authenticate, Claims, SessionManager};
    pub use crate::db::{Database, UserRecord};
    pub use crate::error::{AdminError, ErrorCode, Result};
    pub use crate::middleware::{AuthLayer, CurrentUser};
    pub use crate::rbac::{
        assignable_roles, can_assign_role,
        permissions::{
            can_access_admin_panel, can_create_courses, can_edit_user, can_grant_role,
            can_import_excel, can_manage_employees,
        },
        Role,
    };
    pub use crate::validation::{Validate, ValidationErrors};
}
