//! Course provider endpoints.
//!
//! Same write gate as courses: exactly `hr_super`. Provider names are
//! unique; a duplicate maps to 409 whether it is caught by the pre-check
//! or the store constraint.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{ApiResponse, AppState};
use crate::db::NewProvider;
use crate::error::{AdminError, Result};
use crate::middleware::CurrentUser;
use crate::rbac::permissions::can_create_courses;
use crate::validation::rules::{Email, MaxLength, MinLength, Required, Url};
use crate::validation::{validate_field, Validate, ValidationErrors};

// ═══════════════════════════════════════════════════════════════════════════════
// List
// ═══════════════════════════════════════════════════════════════════════════════

/// `GET /api/v1/providers`
pub async fn list_providers(
    CurrentUser(_claims): CurrentUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let providers = state.db.list_providers().await?;
    Ok(Json(ApiResponse::success(providers)))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Create
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateProviderRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
}

impl Validate for CreateProviderRequest {
    fn collect_errors(&self, errors: &mut ValidationErrors) {
        validate_field(
            "name",
            self.name.as_str(),
            &[&Required, &MinLength(2), &MaxLength(255)],
            errors,
        );
        validate_field("website", &self.website, &[&Url], errors);
        validate_field("contactEmail", &self.contact_email, &[&Email], errors);
        validate_field("contactPhone", &self.contact_phone, &[&MaxLength(50)], errors);
    }
}

/// `POST /api/v1/providers`
pub async fn create_provider(
    CurrentUser(claims): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateProviderRequest>,
) -> Result<impl IntoResponse> {
    if !can_create_courses(claims.role) {
        return Err(AdminError::forbidden());
    }

    payload.validate()?;

    let provider = state
        .db
        .insert_provider(&NewProvider {
            name: payload.name,
            description: payload.description,
            website: payload.website,
            contact_email: payload.contact_email,
            contact_phone: payload.contact_phone,
            created_by: Some(claims.sub),
        })
        .await
        .map_err(|e| match e.code() {
            crate::error::ErrorCode::DuplicateRecord => AdminError::duplicate("Provider"),
            _ => e,
        })?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(provider))))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Update
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProviderRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub is_active: Option<bool>,
}

impl Validate for UpdateProviderRequest {
    fn collect_errors(&self, errors: &mut ValidationErrors) {
        validate_field("name", &self.name, &[&MinLength(2), &MaxLength(255)], errors);
        validate_field("website", &self.website, &[&Url], errors);
        validate_field("contactEmail", &self.contact_email, &[&Email], errors);
        validate_field("contactPhone", &self.contact_phone, &[&MaxLength(50)], errors);
    }
}

/// `PATCH /api/v1/providers/:id`
pub async fn update_provider(
    CurrentUser(claims): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProviderRequest>,
) -> Result<impl IntoResponse> {
    if !can_create_courses(claims.role) {
        return Err(AdminError::forbidden());
    }

    payload.validate()?;

    let mut provider = state
        .db
        .get_provider(id)
        .await?
        .ok_or_else(|| AdminError::not_found("Provider"))?;

    if let Some(name) = payload.name {
        provider.name = name;
    }
    if let Some(description) = payload.description {
        provider.description = Some(description);
    }
    if let Some(website) = payload.website {
        provider.website = Some(website);
    }
    if let Some(contact_email) = payload.contact_email {
        provider.contact_email = Some(contact_email);
    }
    if let Some(contact_phone) = payload.contact_phone {
        provider.contact_phone = Some(contact_phone);
    }
    if let Some(is_active) = payload.is_active {
        provider.is_active = is_active;
    }

    let updated = state
        .db
        .update_provider(&provider)
        .await
        .map_err(|e| match e.code() {
            crate::error::ErrorCode::DuplicateRecord => AdminError::duplicate("Provider"),
            _ => e,
        })?;

    Ok(Json(ApiResponse::success(updated)))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Delete
// ═══════════════════════════════════════════════════════════════════════════════

/// `DELETE /api/v1/providers/:id` — hard delete; courses referencing the
/// provider keep existing with a cleared link.
pub async fn delete_provider(
    CurrentUser(claims): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    if !can_create_courses(claims.role) {
        return Err(AdminError::forbidden());
    }

    if !state.db.delete_provider(id).await? {
        return Err(AdminError::not_found("Provider"));
    }

    Ok(Json(ApiResponse::success(serde_json::json!({
        "message": "Provider deleted"
    }))))
}
