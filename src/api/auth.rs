//! Login endpoint.

use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use super::{ApiResponse, AppState};
use crate::auth::authenticate;
use crate::db::UserRecord;
use crate::error::{AdminError, Result};
use crate::validation::rules::{EmployeeId, Required, ValidationRule};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "employeeId")]
    pub employee_id: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserRecord,
}

/// `POST /api/v1/auth/login`
///
/// Malformed credentials collapse into the same generic 401 as a wrong
/// password; the login form never learns which part was wrong.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    if EmployeeId.validate(payload.employee_id.as_str()).is_some()
        || Required.validate(payload.password.as_str()).is_some()
    {
        return Err(AdminError::invalid_credentials()
            .with_internal("login payload failed shape check"));
    }

    let user = authenticate(&state.db, &payload.employee_id, &payload.password).await?;

    let token = state.sessions.issue(
        user.id,
        &user.employee_id,
        user.role,
        &user.first_name,
        &user.last_name,
    )?;

    Ok(Json(ApiResponse::success(LoginResponse {
        token,
        user: user.into(),
    })))
}
