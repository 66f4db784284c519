//! User management endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{ApiResponse, AppState};
use crate::auth::hash_password;
use crate::db::{NewUser, UserRecord};
use crate::error::{AdminError, Result};
use crate::middleware::CurrentUser;
use crate::rbac::permissions::{can_edit_user, can_grant_role, can_manage_employees};
use crate::rbac::Role;
use crate::validation::rules::{
    Email, EmployeeId, MaxLength, MinLength, PasswordStrength, Required,
};
use crate::validation::{validate_field, Validate, ValidationErrors};

// ═══════════════════════════════════════════════════════════════════════════════
// List
// ═══════════════════════════════════════════════════════════════════════════════

/// `GET /api/v1/users`
pub async fn list_users(
    CurrentUser(claims): CurrentUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    if !can_manage_employees(claims.role) {
        return Err(AdminError::forbidden());
    }

    let users: Vec<UserRecord> = state
        .db
        .list_users()
        .await?
        .into_iter()
        .map(UserRecord::from)
        .collect();

    Ok(Json(ApiResponse::success(users)))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Create
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateUserRequest {
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub password: String,
    pub role: Role,
}

impl Validate for CreateUserRequest {
    fn collect_errors(&self, errors: &mut ValidationErrors) {
        validate_field(
            "employeeId",
            self.employee_id.as_str(),
            &[&Required, &EmployeeId],
            errors,
        );
        validate_field(
            "firstName",
            self.first_name.as_str(),
            &[&Required, &MinLength(2), &MaxLength(100)],
            errors,
        );
        validate_field(
            "lastName",
            self.last_name.as_str(),
            &[&Required, &MinLength(2), &MaxLength(100)],
            errors,
        );
        validate_field(
            "password",
            self.password.as_str(),
            &[&Required, &PasswordStrength::standard()],
            errors,
        );
        validate_field("email", &self.email, &[&Email], errors);
    }
}

/// `POST /api/v1/users`
pub async fn create_user(
    CurrentUser(claims): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse> {
    if !can_manage_employees(claims.role) {
        return Err(AdminError::forbidden());
    }

    payload.validate()?;

    if !can_grant_role(claims.role, payload.role) {
        return Err(AdminError::role_not_assignable(payload.role));
    }

    // Pre-check for a friendlier error; the unique constraint still backs
    // the race window.
    if state
        .db
        .find_user_by_employee_id(&payload.employee_id)
        .await?
        .is_some()
    {
        return Err(AdminError::duplicate("User"));
    }

    let user = state
        .db
        .insert_user(&NewUser {
            employee_id: payload.employee_id,
            password_hash: hash_password(&payload.password)?,
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email.filter(|e| !e.is_empty()),
            role: payload.role,
            created_by: Some(claims.sub),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserRecord::from(user))),
    ))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Update
// ═══════════════════════════════════════════════════════════════════════════════

/// Partial update. Only these fields are writable; anything else in the
/// payload is rejected at deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

impl Validate for UpdateUserRequest {
    fn collect_errors(&self, errors: &mut ValidationErrors) {
        validate_field(
            "firstName",
            &self.first_name,
            &[&MinLength(2), &MaxLength(100)],
            errors,
        );
        validate_field(
            "lastName",
            &self.last_name,
            &[&MinLength(2), &MaxLength(100)],
            errors,
        );
        validate_field("email", &self.email, &[&Email], errors);
    }
}

/// `PATCH /api/v1/users/:id`
pub async fn update_user(
    CurrentUser(claims): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse> {
    if !can_manage_employees(claims.role) {
        return Err(AdminError::forbidden());
    }

    payload.validate()?;

    let mut target = state
        .db
        .get_user(id)
        .await?
        .ok_or_else(|| AdminError::not_found("User"))?;

    if !can_edit_user(claims.role, target.role) {
        return Err(AdminError::forbidden());
    }

    let role_changed = payload.role.is_some_and(|r| r != target.role);
    let deactivated = payload.is_active == Some(false) && target.is_active;

    if let Some(role) = payload.role {
        if role_changed && !can_grant_role(claims.role, role) {
            return Err(AdminError::role_not_assignable(role));
        }
        target.role = role;
    }
    if let Some(first_name) = payload.first_name {
        target.first_name = first_name;
    }
    if let Some(last_name) = payload.last_name {
        target.last_name = last_name;
    }
    if let Some(email) = payload.email {
        // An explicit empty string clears the address.
        target.email = if email.is_empty() { None } else { Some(email) };
    }
    if let Some(is_active) = payload.is_active {
        target.is_active = is_active;
    }

    let updated = state.db.update_user(&target).await?;

    // Stale sessions would keep the old role alive until expiry.
    if role_changed || deactivated {
        state.sessions.invalidate_user(updated.id);
    }

    Ok(Json(ApiResponse::success(UserRecord::from(updated))))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Password Reset
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

/// `POST /api/v1/users/:id/reset-password`
///
/// Admin reset uses a looser length floor than self-service creation.
pub async fn reset_password(
    CurrentUser(claims): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse> {
    if !can_manage_employees(claims.role) {
        return Err(AdminError::forbidden());
    }

    let mut errors = ValidationErrors::new();
    validate_field(
        "password",
        payload.password.as_str(),
        &[&Required, &MinLength(4)],
        &mut errors,
    );
    if !errors.is_empty() {
        return Err(errors.into());
    }

    let target = state
        .db
        .get_user(id)
        .await?
        .ok_or_else(|| AdminError::not_found("User"))?;

    if !can_edit_user(claims.role, target.role) {
        return Err(AdminError::forbidden());
    }

    let hash = hash_password(&payload.password)?;
    state.db.update_user_password(target.id, &hash).await?;

    Ok(Json(ApiResponse::success(serde_json::json!({
        "message": "Password updated"
    }))))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_with_empty_email_validates() {
        // An explicit "" clears the address, so it must pass validation
        // and reach the clearing branch.
        let payload = UpdateUserRequest {
            email: Some(String::new()),
            ..Default::default()
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_create_with_empty_email_validates() {
        let payload = CreateUserRequest {
            employee_id: "1234567".to_string(),
            first_name: "Анна".to_string(),
            last_name: "Петрова".to_string(),
            email: Some(String::new()),
            password: "Passw0rd".to_string(),
            role: Role::Employee,
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_malformed_email_still_rejected() {
        let payload = UpdateUserRequest {
            email: Some("not-an-email".to_string()),
            ..Default::default()
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.has_errors("email"));
    }
}
