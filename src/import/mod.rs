//! Spreadsheet parsing and per-row vetting for bulk user import.
//!
//! The workbook's first sheet must carry a header row with the columns
//! `employeeId`, `firstName`, `lastName`, `password`, `role` and optionally
//! `email`. Each data row is vetted independently; a bad row is reported
//! and skipped, never aborting the batch. Reported row numbers are sheet
//! row numbers, so data row `k` (0-based) reports as `k + 2` past the
//! header.

use crate::rbac::Role;
use crate::validation::rules::{EmployeeId, MaxLength, MinLength, PasswordStrength, Required};
use crate::validation::{validate_field, ValidationErrors};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::str::FromStr;

// ═══════════════════════════════════════════════════════════════════════════════
// Report Types
// ═══════════════════════════════════════════════════════════════════════════════

/// Outcome of one failed row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowError {
    /// Sheet row number (1-based, header is row 1).
    pub row: usize,
    /// Personnel number as found in the sheet, or "N/A" when absent.
    #[serde(rename = "employeeId")]
    pub employee_id: String,
    pub error: String,
}

/// Accumulated result of a bulk import.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportReport {
    pub success: usize,
    pub failed: usize,
    pub errors: Vec<RowError>,
}

impl ImportReport {
    pub fn record_success(&mut self) {
        self.success += 1;
    }

    pub fn record_failure(&mut self, row: usize, employee_id: &str, error: impl Into<String>) {
        self.failed += 1;
        self.errors.push(RowError {
            row,
            employee_id: if employee_id.is_empty() {
                "N/A".to_string()
            } else {
                employee_id.to_string()
            },
            error: error.into(),
        });
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Sheet Parsing
// ═══════════════════════════════════════════════════════════════════════════════

/// One data row as read from the sheet, untyped and untrimmed of semantics.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    /// Sheet row number this row sits on.
    pub row_number: usize,
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Errors from workbook-level parsing, before any row is examined.
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("workbook could not be read: {0}")]
    Unreadable(String),
    #[error("workbook has no sheets")]
    NoSheet,
    #[error("sheet has no data rows")]
    Empty,
    #[error("missing required column: {0}")]
    MissingColumn(&'static str),
}

const REQUIRED_COLUMNS: [&str; 5] = ["employeeId", "firstName", "lastName", "password", "role"];

/// Parse the first sheet of an `.xlsx`/`.xls` workbook into raw rows.
pub fn parse_workbook(bytes: &[u8]) -> Result<Vec<RawRow>, SheetError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook =
        open_workbook_auto_from_rs(cursor).map_err(|e| SheetError::Unreadable(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SheetError::NoSheet)?
        .map_err(|e| SheetError::Unreadable(e.to_string()))?;

    let mut rows = range.rows();
    let header = rows.next().ok_or(SheetError::Empty)?;

    let positions = column_positions(header)?;

    let mut out = Vec::new();
    for (i, cells) in rows.enumerate() {
        let get = |col: Option<usize>| {
            col.and_then(|c| cells.get(c))
                .map(cell_text)
                .unwrap_or_default()
        };
        let raw = RawRow {
            // Header is sheet row 1, so the first data row is row 2.
            row_number: i + 2,
            employee_id: get(positions.employee_id),
            first_name: get(positions.first_name),
            last_name: get(positions.last_name),
            email: get(positions.email),
            password: get(positions.password),
            role: get(positions.role),
        };
        // Fully blank rows are common at the bottom of real sheets.
        if raw.employee_id.is_empty()
            && raw.first_name.is_empty()
            && raw.last_name.is_empty()
            && raw.password.is_empty()
            && raw.role.is_empty()
        {
            continue;
        }
        out.push(raw);
    }

    if out.is_empty() {
        return Err(SheetError::Empty);
    }
    Ok(out)
}

#[derive(Debug, Default)]
struct ColumnPositions {
    employee_id: Option<usize>,
    first_name: Option<usize>,
    last_name: Option<usize>,
    email: Option<usize>,
    password: Option<usize>,
    role: Option<usize>,
}

fn column_positions(header: &[Data]) -> Result<ColumnPositions, SheetError> {
    let mut positions = ColumnPositions::default();
    for (i, cell) in header.iter().enumerate() {
        match cell_text(cell).as_str() {
            "employeeId" => positions.employee_id = Some(i),
            "firstName" => positions.first_name = Some(i),
            "lastName" => positions.last_name = Some(i),
            "email" => positions.email = Some(i),
            "password" => positions.password = Some(i),
            "role" => positions.role = Some(i),
            _ => {}
        }
    }
    for name in REQUIRED_COLUMNS {
        let present = match name {
            "employeeId" => positions.employee_id.is_some(),
            "firstName" => positions.first_name.is_some(),
            "lastName" => positions.last_name.is_some(),
            "password" => positions.password.is_some(),
            "role" => positions.role.is_some(),
            _ => true,
        };
        if !present {
            return Err(SheetError::MissingColumn(name));
        }
    }
    Ok(positions)
}

/// Render a cell as trimmed text.
///
/// Numeric cells are the usual trap: a personnel number typed as a number
/// arrives as a float, so integral floats render without a fraction or
/// exponent.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{:.0}", f),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Error(_) | Data::Empty => String::new(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Row Vetting
// ═══════════════════════════════════════════════════════════════════════════════

/// A row that passed validation and is ready for the closure and
/// duplicate checks.
#[derive(Debug, Clone)]
pub struct VettedRow {
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub password: String,
    pub role: Role,
}

/// Validate one raw row. All field failures are collected into a single
/// message so one pass over the sheet reports everything wrong.
pub fn vet_row(raw: &RawRow) -> Result<VettedRow, String> {
    let mut errors = ValidationErrors::new();
    validate_field(
        "employeeId",
        raw.employee_id.as_str(),
        &[&Required, &EmployeeId],
        &mut errors,
    );
    validate_field(
        "firstName",
        raw.first_name.as_str(),
        &[&Required, &MinLength(2), &MaxLength(100)],
        &mut errors,
    );
    validate_field(
        "lastName",
        raw.last_name.as_str(),
        &[&Required, &MinLength(2), &MaxLength(100)],
        &mut errors,
    );
    validate_field(
        "password",
        raw.password.as_str(),
        &[&Required, &PasswordStrength::standard()],
        &mut errors,
    );
    if !raw.email.is_empty() {
        validate_field(
            "email",
            raw.email.as_str(),
            &[&crate::validation::rules::Email],
            &mut errors,
        );
    }

    let role = match Role::from_str(raw.role.trim()) {
        Ok(role) => Some(role),
        Err(e) => {
            errors.add(
                "role",
                crate::validation::FieldError::with_message(
                    crate::validation::ValidationErrorKind::NotInSet {
                        allowed: Role::ALL.iter().map(|r| r.as_str().to_string()).collect(),
                    },
                    e.to_string(),
                ),
            );
            None
        }
    };

    if !errors.is_empty() {
        return Err(errors.to_flat_messages().join(", "));
    }
    // errors is empty, so the role parse above succeeded.
    let role = role.ok_or_else(|| "role: field is required".to_string())?;

    Ok(VettedRow {
        employee_id: raw.employee_id.clone(),
        first_name: raw.first_name.clone(),
        last_name: raw.last_name.clone(),
        email: if raw.email.is_empty() {
            None
        } else {
            Some(raw.email.clone())
        },
        password: raw.password.clone(),
        role,
    })
}

/// Full per-row decision short of the store: validate, then check the row's
/// role against the importing actor's assignable set. The duplicate check
/// and insert stay with the caller, which has the store at hand.
pub fn screen_row(raw: &RawRow, allowed: &[Role]) -> Result<VettedRow, String> {
    let vetted = vet_row(raw)?;
    if !allowed.contains(&vetted.role) {
        return Err(format!("cannot assign role: {}", vetted.role));
    }
    Ok(vetted)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn good_row() -> RawRow {
        RawRow {
            row_number: 2,
            employee_id: "1234567".to_string(),
            first_name: "Анна".to_string(),
            last_name: "Петрова".to_string(),
            email: "anna@example.com".to_string(),
            password: "Passw0rd".to_string(),
            role: "employee".to_string(),
        }
    }

    #[test]
    fn test_cell_text_numeric_employee_id() {
        assert_eq!(cell_text(&Data::Float(1234567.0)), "1234567");
        assert_eq!(cell_text(&Data::Int(1234567)), "1234567");
        assert_eq!(cell_text(&Data::String("  1234567 ".to_string())), "1234567");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn test_vet_row_accepts_good_row() {
        let vetted = vet_row(&good_row()).unwrap();
        assert_eq!(vetted.employee_id, "1234567");
        assert_eq!(vetted.role, Role::Employee);
        assert_eq!(vetted.email.as_deref(), Some("anna@example.com"));
    }

    #[test]
    fn test_vet_row_email_optional() {
        let mut row = good_row();
        row.email = String::new();
        let vetted = vet_row(&row).unwrap();
        assert!(vetted.email.is_none());
    }

    #[test]
    fn test_vet_row_collects_every_failure() {
        let mut row = good_row();
        row.employee_id = "12ab".to_string();
        row.password = "short".to_string();
        row.role = "boss".to_string();
        let message = vet_row(&row).unwrap_err();
        assert!(message.contains("employeeId"));
        assert!(message.contains("password"));
        assert!(message.contains("role"));
    }

    #[test]
    fn test_screen_row_rejects_role_outside_closure() {
        let mut row = good_row();
        row.role = "hr_central".to_string();
        let allowed = crate::rbac::assignable_roles(Role::HrRegional);
        let message = screen_row(&row, allowed).unwrap_err();
        assert!(message.contains("cannot assign role: hr_central"));

        // The same row is fine for a sufficiently senior importer.
        let allowed = crate::rbac::assignable_roles(Role::HrSuper);
        assert!(screen_row(&row, allowed).is_ok());
    }

    #[test]
    fn test_two_bad_rows_of_four() {
        // Sheet rows 2..5: a validation failure and a role outside the
        // importer's closure fail; the other two pass screening.
        let mut rows = vec![good_row(), good_row(), good_row(), good_row()];
        for (i, row) in rows.iter_mut().enumerate() {
            row.row_number = i + 2;
            row.employee_id = format!("100000{}", i);
        }
        rows[1].employee_id = "12ab".to_string();
        rows[2].role = "hr_super".to_string();

        let allowed = crate::rbac::assignable_roles(Role::HrRegional);
        let mut report = ImportReport::default();
        for raw in &rows {
            match screen_row(raw, allowed) {
                Ok(_) => report.record_success(),
                Err(message) => report.record_failure(raw.row_number, &raw.employee_id, message),
            }
        }

        assert_eq!(report.success, 2);
        assert_eq!(report.failed, 2);
        assert_eq!(report.errors.len(), 2);
        // Row numbers are sheet rows, offset past the header.
        assert_eq!(report.errors[0].row, 3);
        assert_eq!(report.errors[1].row, 4);
        assert_eq!(report.errors[1].employee_id, "1000002");
    }

    #[test]
    fn test_report_accounting() {
        let mut report = ImportReport::default();
        report.record_success();
        report.record_success();
        report.record_failure(3, "1234567", "duplicate");
        report.record_failure(5, "", "missing fields");

        assert_eq!(report.success, 2);
        assert_eq!(report.failed, 2);
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.errors[0].row, 3);
        assert_eq!(report.errors[1].employee_id, "N/A");
    }

    #[test]
    fn test_report_wire_shape() {
        let mut report = ImportReport::default();
        report.record_failure(2, "1234567", "duplicate");
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"success\":0"));
        assert!(json.contains("\"failed\":1"));
        assert!(json.contains("\"employeeId\":\"1234567\""));
        assert!(json.contains("\"row\":2"));
    }
}
