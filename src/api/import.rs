//! Bulk user import endpoint.

use axum::{extract::Multipart, extract::State, response::IntoResponse, Json};
use metrics::{counter, histogram};
use std::time::Instant;
use tracing::info;

use super::{ApiResponse, AppState};
use crate::auth::hash_password;
use crate::db::NewUser;
use crate::error::{AdminError, ErrorCode, Result};
use crate::import::{parse_workbook, screen_row, ImportReport};
use crate::middleware::CurrentUser;
use crate::rbac::hierarchy::assignable_roles;
use crate::rbac::permissions::can_import_excel;

/// `POST /api/v1/users/import`
///
/// Multipart upload with a single `file` part holding an `.xlsx` or `.xls`
/// workbook. Rows are processed sequentially in sheet order; a failing row
/// is recorded and skipped. The whole request only fails on a bad file or
/// a store outage, never on row content.
pub async fn import_users(
    CurrentUser(claims): CurrentUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    if !can_import_excel(claims.role) {
        return Err(AdminError::forbidden());
    }

    let (filename, bytes) = read_file_part(&mut multipart).await?;
    if !filename.ends_with(".xlsx") && !filename.ends_with(".xls") {
        return Err(AdminError::invalid_file(
            "Unsupported file format, expected .xlsx or .xls",
        ));
    }

    let rows = parse_workbook(&bytes).map_err(|e| AdminError::invalid_file(e.to_string()))?;
    let allowed = assignable_roles(claims.role);

    let started = Instant::now();
    let mut report = ImportReport::default();

    for raw in &rows {
        let vetted = match screen_row(raw, allowed) {
            Ok(vetted) => vetted,
            Err(message) => {
                report.record_failure(raw.row_number, &raw.employee_id, message);
                continue;
            }
        };

        if state
            .db
            .find_user_by_employee_id(&vetted.employee_id)
            .await?
            .is_some()
        {
            report.record_failure(raw.row_number, &vetted.employee_id, "User already exists");
            continue;
        }

        let new_user = NewUser {
            employee_id: vetted.employee_id.clone(),
            password_hash: hash_password(&vetted.password)?,
            first_name: vetted.first_name,
            last_name: vetted.last_name,
            email: vetted.email,
            role: vetted.role,
            created_by: Some(claims.sub),
        };

        match state.db.insert_user(&new_user).await {
            Ok(_) => report.record_success(),
            // A concurrent insert can still win the race past the pre-check.
            Err(e) if e.code() == ErrorCode::DuplicateRecord => {
                report.record_failure(raw.row_number, &vetted.employee_id, "User already exists");
            }
            Err(e) => return Err(e),
        }
    }

    counter!("hr_admin_import_rows_total", "outcome" => "success")
        .increment(report.success as u64);
    counter!("hr_admin_import_rows_total", "outcome" => "failure")
        .increment(report.failed as u64);
    histogram!("hr_admin_import_duration_seconds").record(started.elapsed().as_secs_f64());

    info!(
        success = report.success,
        failed = report.failed,
        actor = %claims.employee_id,
        "bulk import finished"
    );

    Ok(Json(ApiResponse::success(report)))
}

async fn read_file_part(multipart: &mut Multipart) -> Result<(String, Vec<u8>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AdminError::invalid_file(format!("malformed multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AdminError::invalid_file(format!("upload truncated: {e}")))?;
            return Ok((filename, bytes.to_vec()));
        }
    }
    Err(AdminError::invalid_file("No file provided"))
}
