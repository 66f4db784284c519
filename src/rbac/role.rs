//! The six-role hierarchy used across the application.
//!
//! | Role        | Rank | Description                                    |
//! |-------------|------|------------------------------------------------|
//! | super_admin | 6    | Platform owner; manages HR super admins        |
//! | hr_super    | 5    | Central HR lead; owns the course catalog       |
//! | hr_central  | 4    | Central office HR administrator                |
//! | hr_regional | 3    | Regional HR administrator                      |
//! | hr_line     | 2    | Line-level HR administrator                    |
//! | employee    | 1    | Regular employee; no administrative access     |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A user's role. Every user has exactly one role at any time.
///
/// Stored in Postgres as the `role` enum; serialized snake_case on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "role", rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    HrSuper,
    HrCentral,
    HrRegional,
    HrLine,
    Employee,
}

impl Role {
    /// All roles, highest rank first.
    pub const ALL: [Role; 6] = [
        Role::SuperAdmin,
        Role::HrSuper,
        Role::HrCentral,
        Role::HrRegional,
        Role::HrLine,
        Role::Employee,
    ];

    /// Numeric seniority. Higher means more senior.
    pub const fn rank(&self) -> u8 {
        match self {
            Role::SuperAdmin => 6,
            Role::HrSuper => 5,
            Role::HrCentral => 4,
            Role::HrRegional => 3,
            Role::HrLine => 2,
            Role::Employee => 1,
        }
    }

    /// Wire/database identifier.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::HrSuper => "hr_super",
            Role::HrCentral => "hr_central",
            Role::HrRegional => "hr_regional",
            Role::HrLine => "hr_line",
            Role::Employee => "employee",
        }
    }

    /// Fixed localized display label. Total over all six roles; a missing
    /// case here is a compile error, not a runtime condition.
    pub const fn display_name(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "Супер Админ",
            Role::HrSuper => "HR Супер Админ",
            Role::HrCentral => "HR Центральный Админ",
            Role::HrRegional => "HR Региональный Админ",
            Role::HrLine => "HR Линейный Админ",
            Role::Employee => "Сотрудник",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Role::SuperAdmin),
            "hr_super" => Ok(Role::HrSuper),
            "hr_central" => Ok(Role::HrCentral),
            "hr_regional" => Ok(Role::HrRegional),
            "hr_line" => Ok(Role::HrLine),
            "employee" => Ok(Role::Employee),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_are_strictly_ordered() {
        let ranks: Vec<u8> = Role::ALL.iter().map(|r| r.rank()).collect();
        assert_eq!(ranks, vec![6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_round_trip_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!("admin".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_display_names_cover_all_roles() {
        for role in Role::ALL {
            assert!(!role.display_name().is_empty());
        }
        assert_eq!(Role::Employee.display_name(), "Сотрудник");
        assert_eq!(Role::SuperAdmin.display_name(), "Супер Админ");
    }
}
