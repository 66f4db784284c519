//! Role assignment tables.
//!
//! Two distinct relations, both explicit adjacency tables rather than rank
//! arithmetic:
//!
//! - [`can_assign_role`] — the single-step relation: each role may directly
//!   assign exactly the one role immediately below it in the chain.
//! - [`assignable_roles`] — the full downward closure used when creating or
//!   importing accounts: every role strictly below the actor's.
//!
//! The closure is not derivable from the single-step table by clients; the
//! two are separate, separately tested operations.

use super::role::Role;

/// Single-step assignment: the one role immediately below the actor.
///
/// `hr_line` bottoms out at `employee`; `employee` assigns nothing.
pub fn can_assign_role(actor: Role, target: Role) -> bool {
    let next = match actor {
        Role::SuperAdmin => Some(Role::HrSuper),
        Role::HrSuper => Some(Role::HrCentral),
        Role::HrCentral => Some(Role::HrRegional),
        Role::HrRegional => Some(Role::HrLine),
        Role::HrLine => Some(Role::Employee),
        Role::Employee => None,
    };
    next == Some(target)
}

/// The full set of roles the actor may grant: everything strictly below it
/// in the chain, in descending rank order.
pub fn assignable_roles(actor: Role) -> &'static [Role] {
    match actor {
        Role::SuperAdmin => &[
            Role::HrSuper,
            Role::HrCentral,
            Role::HrRegional,
            Role::HrLine,
            Role::Employee,
        ],
        Role::HrSuper => &[
            Role::HrCentral,
            Role::HrRegional,
            Role::HrLine,
            Role::Employee,
        ],
        Role::HrCentral => &[Role::HrRegional, Role::HrLine, Role::Employee],
        Role::HrRegional => &[Role::HrLine, Role::Employee],
        Role::HrLine => &[Role::Employee],
        Role::Employee => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_step_is_exactly_one_role() {
        assert!(can_assign_role(Role::SuperAdmin, Role::HrSuper));
        assert!(!can_assign_role(Role::SuperAdmin, Role::HrCentral));
        assert!(!can_assign_role(Role::SuperAdmin, Role::Employee));

        assert!(can_assign_role(Role::HrLine, Role::Employee));
        assert!(!can_assign_role(Role::Employee, Role::Employee));
    }

    #[test]
    fn test_single_step_never_reflexive_or_upward() {
        for actor in Role::ALL {
            assert!(!can_assign_role(actor, actor));
            for target in Role::ALL {
                if target.rank() > actor.rank() {
                    assert!(!can_assign_role(actor, target));
                }
            }
        }
    }

    #[test]
    fn test_closure_matches_chain() {
        assert_eq!(
            assignable_roles(Role::HrRegional),
            &[Role::HrLine, Role::Employee]
        );
        assert_eq!(assignable_roles(Role::HrLine), &[Role::Employee]);
        assert!(assignable_roles(Role::Employee).is_empty());
        assert_eq!(assignable_roles(Role::SuperAdmin).len(), 5);
    }

    #[test]
    fn test_closure_is_everything_strictly_below() {
        for actor in Role::ALL {
            let closure = assignable_roles(actor);
            for target in Role::ALL {
                let below = target.rank() < actor.rank();
                assert_eq!(closure.contains(&target), below);
            }
        }
    }

    #[test]
    fn test_closure_contains_single_step() {
        // The direct assignment target is always inside the closure.
        for actor in Role::ALL {
            for target in Role::ALL {
                if can_assign_role(actor, target) {
                    assert!(assignable_roles(actor).contains(&target));
                }
            }
        }
    }
}
