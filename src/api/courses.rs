//! Course catalog endpoints.
//!
//! Reads require only a session; writes are gated on exactly `hr_super`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{ApiResponse, AppState};
use crate::db::{CourseFormat, NewCourse, TrainingType};
use crate::error::{AdminError, Result};
use crate::middleware::CurrentUser;
use crate::rbac::permissions::can_create_courses;
use crate::validation::rules::{MaxLength, MinLength, Required};
use crate::validation::{validate_field, Validate, ValidationErrors};

// ═══════════════════════════════════════════════════════════════════════════════
// List
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub struct ListCoursesQuery {
    #[serde(default)]
    pub active: Option<bool>,
}

/// `GET /api/v1/courses?active=true`
pub async fn list_courses(
    CurrentUser(_claims): CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<ListCoursesQuery>,
) -> Result<impl IntoResponse> {
    let courses = state
        .db
        .list_courses(query.active.unwrap_or(false))
        .await?;
    Ok(Json(ApiResponse::success(courses)))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Create
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateCourseRequest {
    pub title: String,
    pub training_type: TrainingType,
    pub program_direction: String,
    pub training_name: String,
    pub duration: String,
    pub format: CourseFormat,
    pub price_without_vat: String,
    pub price_with_vat: String,
    #[serde(default)]
    pub provider_id: Option<Uuid>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl Validate for CreateCourseRequest {
    fn collect_errors(&self, errors: &mut ValidationErrors) {
        validate_field(
            "title",
            self.title.as_str(),
            &[&Required, &MinLength(2), &MaxLength(255)],
            errors,
        );
        validate_field(
            "programDirection",
            self.program_direction.as_str(),
            &[&Required, &MaxLength(255)],
            errors,
        );
        validate_field(
            "trainingName",
            self.training_name.as_str(),
            &[&Required, &MaxLength(500)],
            errors,
        );
        validate_field(
            "duration",
            self.duration.as_str(),
            &[&Required, &MaxLength(100)],
            errors,
        );
        validate_field(
            "priceWithoutVat",
            self.price_without_vat.as_str(),
            &[&Required, &MaxLength(50)],
            errors,
        );
        validate_field(
            "priceWithVat",
            self.price_with_vat.as_str(),
            &[&Required, &MaxLength(50)],
            errors,
        );
    }
}

/// `POST /api/v1/courses`
pub async fn create_course(
    CurrentUser(claims): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateCourseRequest>,
) -> Result<impl IntoResponse> {
    if !can_create_courses(claims.role) {
        return Err(AdminError::forbidden());
    }

    payload.validate()?;

    if let Some(provider_id) = payload.provider_id {
        if state.db.get_provider(provider_id).await?.is_none() {
            return Err(AdminError::not_found("Provider"));
        }
    }

    let course = state
        .db
        .insert_course(&NewCourse {
            title: payload.title,
            training_type: payload.training_type,
            program_direction: payload.program_direction,
            training_name: payload.training_name,
            duration: payload.duration,
            format: payload.format,
            price_without_vat: payload.price_without_vat,
            price_with_vat: payload.price_with_vat,
            provider_id: payload.provider_id,
            description: payload.description,
            content: payload.content,
            created_by: Some(claims.sub),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(course))))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Update
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub training_type: Option<TrainingType>,
    pub program_direction: Option<String>,
    pub training_name: Option<String>,
    pub duration: Option<String>,
    pub format: Option<CourseFormat>,
    pub price_without_vat: Option<String>,
    pub price_with_vat: Option<String>,
    pub provider_id: Option<Uuid>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub is_active: Option<bool>,
}

impl Validate for UpdateCourseRequest {
    fn collect_errors(&self, errors: &mut ValidationErrors) {
        validate_field(
            "title",
            &self.title,
            &[&MinLength(2), &MaxLength(255)],
            errors,
        );
        validate_field(
            "programDirection",
            &self.program_direction,
            &[&MaxLength(255)],
            errors,
        );
        validate_field("trainingName", &self.training_name, &[&MaxLength(500)], errors);
        validate_field("duration", &self.duration, &[&MaxLength(100)], errors);
    }
}

/// `PATCH /api/v1/courses/:id`
pub async fn update_course(
    CurrentUser(claims): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCourseRequest>,
) -> Result<impl IntoResponse> {
    if !can_create_courses(claims.role) {
        return Err(AdminError::forbidden());
    }

    payload.validate()?;

    let mut course = state
        .db
        .get_course(id)
        .await?
        .ok_or_else(|| AdminError::not_found("Course"))?;

    if let Some(provider_id) = payload.provider_id {
        if state.db.get_provider(provider_id).await?.is_none() {
            return Err(AdminError::not_found("Provider"));
        }
        course.provider_id = Some(provider_id);
    }
    if let Some(title) = payload.title {
        course.title = title;
    }
    if let Some(training_type) = payload.training_type {
        course.training_type = training_type;
    }
    if let Some(program_direction) = payload.program_direction {
        course.program_direction = program_direction;
    }
    if let Some(training_name) = payload.training_name {
        course.training_name = training_name;
    }
    if let Some(duration) = payload.duration {
        course.duration = duration;
    }
    if let Some(format) = payload.format {
        course.format = format;
    }
    if let Some(price_without_vat) = payload.price_without_vat {
        course.price_without_vat = price_without_vat;
    }
    if let Some(price_with_vat) = payload.price_with_vat {
        course.price_with_vat = price_with_vat;
    }
    if let Some(description) = payload.description {
        course.description = Some(description);
    }
    if let Some(content) = payload.content {
        course.content = Some(content);
    }
    if let Some(is_active) = payload.is_active {
        course.is_active = is_active;
    }

    let updated = state.db.update_course(&course).await?;
    Ok(Json(ApiResponse::success(updated)))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Delete
// ═══════════════════════════════════════════════════════════════════════════════

/// `DELETE /api/v1/courses/:id` — hard delete.
pub async fn delete_course(
    CurrentUser(claims): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    if !can_create_courses(claims.role) {
        return Err(AdminError::forbidden());
    }

    if !state.db.delete_course(id).await? {
        return Err(AdminError::not_found("Course"));
    }

    Ok(Json(ApiResponse::success(serde_json::json!({
        "message": "Course deleted"
    }))))
}
