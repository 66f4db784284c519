//! Permission evaluator: pure predicates over roles.
//!
//! Each coarse permission is backed by an explicit [`Gate`] entry so the
//! exact-match vs rank-threshold split stays visible in one table. Course
//! catalog writes are an exact-match gate on `hr_super` (not rank-based:
//! `super_admin` cannot create courses); employee management and import
//! are rank thresholds at `hr_line` and above.

use super::hierarchy::assignable_roles;
use super::role::Role;

/// How a permission is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// True iff the role is exactly this one.
    Exact(Role),
    /// True iff the role's rank is at least this role's rank.
    MinRank(Role),
}

impl Gate {
    /// Evaluate the gate against a role.
    pub fn allows(&self, role: Role) -> bool {
        match *self {
            Gate::Exact(required) => role == required,
            Gate::MinRank(floor) => role.rank() >= floor.rank(),
        }
    }
}

/// Course and provider catalog writes. Exact-match on `hr_super`.
pub const COURSE_MANAGEMENT: Gate = Gate::Exact(Role::HrSuper);

/// User record administration. Any HR role, i.e. everything above `employee`.
pub const EMPLOYEE_MANAGEMENT: Gate = Gate::MinRank(Role::HrLine);

/// Spreadsheet bulk import. Same threshold as employee management, kept as
/// a separate named gate because the two are separately evaluated surfaces.
pub const EXCEL_IMPORT: Gate = Gate::MinRank(Role::HrLine);

/// Admin panel access.
pub const ADMIN_PANEL: Gate = Gate::MinRank(Role::HrLine);

/// Whether this role may create or mutate Course/Provider records.
pub fn can_create_courses(role: Role) -> bool {
    COURSE_MANAGEMENT.allows(role)
}

/// Whether this role may create, list, or edit user records.
pub fn can_manage_employees(role: Role) -> bool {
    EMPLOYEE_MANAGEMENT.allows(role)
}

/// Whether this role may run a spreadsheet import.
pub fn can_import_excel(role: Role) -> bool {
    EXCEL_IMPORT.allows(role)
}

/// Whether this role may access the admin panel at all.
pub fn can_access_admin_panel(role: Role) -> bool {
    ADMIN_PANEL.allows(role)
}

/// Whether `actor` may edit the user holding `target` role.
///
/// A super admin may edit anyone except another super admin; the rule is
/// applied by target role alone, so a super admin's own record is blocked
/// too. Everyone else needs strictly higher rank than the target.
pub fn can_edit_user(actor: Role, target: Role) -> bool {
    if actor == Role::SuperAdmin {
        return target != Role::SuperAdmin;
    }
    actor.rank() > target.rank()
}

/// Whether `actor` may grant `target` when creating or updating an account.
pub fn can_grant_role(actor: Role, target: Role) -> bool {
    assignable_roles(actor).contains(&target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_gate_is_exact_match() {
        assert!(can_create_courses(Role::HrSuper));
        // Not rank-based: more senior roles are excluded too.
        assert!(!can_create_courses(Role::SuperAdmin));
        assert!(!can_create_courses(Role::HrCentral));
        assert!(!can_create_courses(Role::HrRegional));
        assert!(!can_create_courses(Role::HrLine));
        assert!(!can_create_courses(Role::Employee));
    }

    #[test]
    fn test_manage_employees_excludes_only_employee() {
        for role in Role::ALL {
            assert_eq!(can_manage_employees(role), role != Role::Employee);
        }
    }

    #[test]
    fn test_import_gate_tracks_manage_gate() {
        for role in Role::ALL {
            assert_eq!(can_import_excel(role), can_manage_employees(role));
        }
    }

    #[test]
    fn test_admin_panel_threshold() {
        assert!(can_access_admin_panel(Role::HrLine));
        assert!(can_access_admin_panel(Role::SuperAdmin));
        assert!(!can_access_admin_panel(Role::Employee));
    }

    #[test]
    fn test_edit_user_super_admin_cases() {
        assert!(!can_edit_user(Role::SuperAdmin, Role::SuperAdmin));
        assert!(can_edit_user(Role::SuperAdmin, Role::HrSuper));
        assert!(can_edit_user(Role::SuperAdmin, Role::Employee));
    }

    #[test]
    fn test_edit_user_requires_strictly_higher_rank() {
        assert!(can_edit_user(Role::HrCentral, Role::HrRegional));
        assert!(!can_edit_user(Role::HrRegional, Role::HrCentral));
        assert!(!can_edit_user(Role::HrRegional, Role::HrRegional));
        assert!(!can_edit_user(Role::Employee, Role::Employee));
    }

    #[test]
    fn test_grant_role_follows_closure() {
        assert!(can_grant_role(Role::HrRegional, Role::Employee));
        assert!(can_grant_role(Role::HrRegional, Role::HrLine));
        assert!(!can_grant_role(Role::HrRegional, Role::HrRegional));
        assert!(!can_grant_role(Role::HrRegional, Role::HrCentral));
        assert!(!can_grant_role(Role::Employee, Role::Employee));
    }
}
