//! Role-Based Access Control (RBAC).
//!
//! This module provides:
//! - **Role**: the six-role enum with rank and display labels
//! - **Hierarchy**: explicit single-step assignment and downward-closure tables
//! - **Permissions**: pure predicates gating every administrative surface
//!
//! # Usage
//!
//! ```rust,ignore
//! use hr_admin_core::rbac::{Role, can_manage_employees, assignable_roles};
//!
//! let role = Role::HrRegional;
//! assert!(can_manage_employees(role));
//! assert_eq!(assignable_roles(role), &[Role::HrLine, Role::Employee]);
//! ```

pub mod hierarchy;
pub mod permissions;
pub mod role;

pub use hierarchy::{assignable_roles, can_assign_role};
pub use permissions::{
    can_access_admin_panel, can_create_courses, can_edit_user, can_grant_role, can_import_excel,
    can_manage_employees, Gate, ADMIN_PANEL, COURSE_MANAGEMENT, EMPLOYEE_MANAGEMENT, EXCEL_IMPORT,
};
pub use role::{ParseRoleError, Role};
