//! Credential authentication.
//!
//! Every failure path collapses into the same `INVALID_CREDENTIALS` error:
//! an unknown personnel number, a wrong password, and a deactivated account
//! are indistinguishable to the caller. Internal log messages keep the real
//! reason for operators.

use crate::auth::password::verify_password;
use crate::db::{Database, UserRow};
use crate::error::{AdminError, Result};
use metrics::counter;

/// Verify credentials against the user store.
///
/// Returns the full user row on success so the caller can issue a session
/// without a second lookup.
pub async fn authenticate(db: &Database, employee_id: &str, password: &str) -> Result<UserRow> {
    let outcome = check(db, employee_id, password).await;
    let label = if outcome.is_ok() { "success" } else { "failure" };
    counter!("hr_admin_logins_total", "outcome" => label).increment(1);
    outcome
}

async fn check(db: &Database, employee_id: &str, password: &str) -> Result<UserRow> {
    let Some(user) = db.find_user_by_employee_id(employee_id).await? else {
        return Err(AdminError::invalid_credentials()
            .with_internal(format!("unknown employee id {employee_id}")));
    };

    if !user.is_active {
        return Err(AdminError::invalid_credentials()
            .with_internal(format!("deactivated account {employee_id}")));
    }

    if !verify_password(password, &user.password_hash) {
        return Err(AdminError::invalid_credentials()
            .with_internal(format!("password mismatch for {employee_id}")));
    }

    Ok(user)
}
