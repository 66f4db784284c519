//! Database layer.
//!
//! Uses PostgreSQL for persistent storage with sqlx. Every mutation is a
//! single SQL statement; partial updates are done read-modify-write in Rust
//! against an allow list, then written back in one `UPDATE ... RETURNING`.
//! Unique-constraint races surface as `sqlx::Error` and map to 409 through
//! the crate error type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::error::{AdminError, Result};
use crate::rbac::Role;

// ═══════════════════════════════════════════════════════════════════════════════
// Enumerations
// ═══════════════════════════════════════════════════════════════════════════════

/// Kind of training a course delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "training_type", rename_all = "snake_case")]
pub enum TrainingType {
    Preparation,
    Retraining,
    ProfessionalDev,
    Mandatory,
}

/// Delivery format of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "course_format", rename_all = "snake_case")]
pub enum CourseFormat {
    Online,
    Offline,
    Hybrid,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Database
// ═══════════════════════════════════════════════════════════════════════════════

/// Database connection and operations.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(std::time::Duration::from_secs(5))
            .connect(&config.url)
            .await?;

        Ok(Self { pool })
    }

    /// Run migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AdminError::from(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // User Operations
    // ═══════════════════════════════════════════════════════════════════════════

    /// Look up a user by personnel number.
    pub async fn find_user_by_employee_id(&self, employee_id: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, employee_id, password_hash, first_name, last_name, email,
                   role, created_by, is_active, created_at, updated_at
            FROM users
            WHERE employee_id = $1
            "#,
        )
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, employee_id, password_hash, first_name, last_name, email,
                   role, created_by, is_active, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// All users, oldest first.
    pub async fn list_users(&self) -> Result<Vec<UserRow>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, employee_id, password_hash, first_name, last_name, email,
                   role, created_by, is_active, created_at, updated_at
            FROM users
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Insert a new user. A duplicate personnel number surfaces as a
    /// unique violation.
    pub async fn insert_user(&self, user: &NewUser) -> Result<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, employee_id, password_hash, first_name, last_name,
                               email, role, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, employee_id, password_hash, first_name, last_name, email,
                      role, created_by, is_active, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.employee_id)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(user.role)
        .bind(user.created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Write back a modified user row. The personnel number and password
    /// hash are not touched here.
    pub async fn update_user(&self, user: &UserRow) -> Result<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET first_name = $2, last_name = $3, email = $4, role = $5,
                is_active = $6, updated_at = now()
            WHERE id = $1
            RETURNING id, employee_id, password_hash, first_name, last_name, email,
                      role, created_by, is_active, created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(user.role)
        .bind(user.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Replace a user's password hash.
    pub async fn update_user_password(&self, id: Uuid, password_hash: &str) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AdminError::not_found("User"));
        }
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Course Operations
    // ═══════════════════════════════════════════════════════════════════════════

    /// Courses, oldest first. `active_only` hides deactivated rows.
    pub async fn list_courses(&self, active_only: bool) -> Result<Vec<CourseRow>> {
        let rows = sqlx::query_as::<_, CourseRow>(
            r#"
            SELECT id, title, training_type, program_direction, training_name,
                   duration, format, price_without_vat, price_with_vat,
                   provider_id, description, content, created_by, is_active,
                   created_at, updated_at
            FROM courses
            WHERE ($1 = false OR is_active = true)
            ORDER BY created_at
            "#,
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn get_course(&self, id: Uuid) -> Result<Option<CourseRow>> {
        let row = sqlx::query_as::<_, CourseRow>(
            r#"
            SELECT id, title, training_type, program_direction, training_name,
                   duration, format, price_without_vat, price_with_vat,
                   provider_id, description, content, created_by, is_active,
                   created_at, updated_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn insert_course(&self, course: &NewCourse) -> Result<CourseRow> {
        let row = sqlx::query_as::<_, CourseRow>(
            r#"
            INSERT INTO courses (id, title, training_type, program_direction,
                                 training_name, duration, format, price_without_vat,
                                 price_with_vat, provider_id, description, content,
                                 created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id, title, training_type, program_direction, training_name,
                      duration, format, price_without_vat, price_with_vat,
                      provider_id, description, content, created_by, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&course.title)
        .bind(course.training_type)
        .bind(&course.program_direction)
        .bind(&course.training_name)
        .bind(&course.duration)
        .bind(course.format)
        .bind(&course.price_without_vat)
        .bind(&course.price_with_vat)
        .bind(course.provider_id)
        .bind(&course.description)
        .bind(&course.content)
        .bind(course.created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn update_course(&self, course: &CourseRow) -> Result<CourseRow> {
        let row = sqlx::query_as::<_, CourseRow>(
            r#"
            UPDATE courses
            SET title = $2, training_type = $3, program_direction = $4,
                training_name = $5, duration = $6, format = $7,
                price_without_vat = $8, price_with_vat = $9, provider_id = $10,
                description = $11, content = $12, is_active = $13,
                updated_at = now()
            WHERE id = $1
            RETURNING id, title, training_type, program_direction, training_name,
                      duration, format, price_without_vat, price_with_vat,
                      provider_id, description, content, created_by, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(course.id)
        .bind(&course.title)
        .bind(course.training_type)
        .bind(&course.program_direction)
        .bind(&course.training_name)
        .bind(&course.duration)
        .bind(course.format)
        .bind(&course.price_without_vat)
        .bind(&course.price_with_vat)
        .bind(course.provider_id)
        .bind(&course.description)
        .bind(&course.content)
        .bind(course.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Hard delete. Returns whether a row existed.
    pub async fn delete_course(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Provider Operations
    // ═══════════════════════════════════════════════════════════════════════════

    /// Providers, alphabetical by name.
    pub async fn list_providers(&self) -> Result<Vec<ProviderRow>> {
        let rows = sqlx::query_as::<_, ProviderRow>(
            r#"
            SELECT id, name, description, website, contact_email, contact_phone,
                   created_by, is_active, created_at, updated_at
            FROM providers
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn get_provider(&self, id: Uuid) -> Result<Option<ProviderRow>> {
        let row = sqlx::query_as::<_, ProviderRow>(
            r#"
            SELECT id, name, description, website, contact_email, contact_phone,
                   created_by, is_active, created_at, updated_at
            FROM providers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Insert a new provider. A duplicate name surfaces as a unique violation.
    pub async fn insert_provider(&self, provider: &NewProvider) -> Result<ProviderRow> {
        let row = sqlx::query_as::<_, ProviderRow>(
            r#"
            INSERT INTO providers (id, name, description, website, contact_email,
                                   contact_phone, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, description, website, contact_email, contact_phone,
                      created_by, is_active, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&provider.name)
        .bind(&provider.description)
        .bind(&provider.website)
        .bind(&provider.contact_email)
        .bind(&provider.contact_phone)
        .bind(provider.created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn update_provider(&self, provider: &ProviderRow) -> Result<ProviderRow> {
        let row = sqlx::query_as::<_, ProviderRow>(
            r#"
            UPDATE providers
            SET name = $2, description = $3, website = $4, contact_email = $5,
                contact_phone = $6, is_active = $7, updated_at = now()
            WHERE id = $1
            RETURNING id, name, description, website, contact_email, contact_phone,
                      created_by, is_active, created_at, updated_at
            "#,
        )
        .bind(provider.id)
        .bind(&provider.name)
        .bind(&provider.description)
        .bind(&provider.website)
        .bind(&provider.contact_email)
        .bind(&provider.contact_phone)
        .bind(provider.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Hard delete. Returns whether a row existed.
    pub async fn delete_provider(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM providers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Row Types
// ═══════════════════════════════════════════════════════════════════════════════

/// A user row as stored. Carries the password hash, so it is never
/// serialized; API responses go through [`UserRecord`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub employee_id: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub role: Role,
    pub created_by: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User shape returned over the API. No password hash field exists here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: Uuid,
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            employee_id: row.employee_id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            role: row.role,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insert shape for a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub employee_id: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub role: Role,
    pub created_by: Option<Uuid>,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRow {
    pub id: Uuid,
    pub title: String,
    pub training_type: TrainingType,
    pub program_direction: String,
    pub training_name: String,
    pub duration: String,
    pub format: CourseFormat,
    pub price_without_vat: String,
    pub price_with_vat: String,
    pub provider_id: Option<Uuid>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub created_by: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert shape for a course.
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub title: String,
    pub training_type: TrainingType,
    pub program_direction: String,
    pub training_name: String,
    pub duration: String,
    pub format: CourseFormat,
    pub price_without_vat: String,
    pub price_with_vat: String,
    pub provider_id: Option<Uuid>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub created_by: Option<Uuid>,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub created_by: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert shape for a provider.
#[derive(Debug, Clone)]
pub struct NewProvider {
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub created_by: Option<Uuid>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_record_has_no_hash() {
        let now = Utc::now();
        let row = UserRow {
            id: Uuid::new_v4(),
            employee_id: "1234567".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            first_name: "Анна".to_string(),
            last_name: "Петрова".to_string(),
            email: None,
            role: Role::HrLine,
            created_by: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let record = UserRecord::from(row);
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
        assert!(json.contains("\"employeeId\":\"1234567\""));
    }

    #[test]
    fn test_enum_wire_format() {
        assert_eq!(
            serde_json::to_string(&TrainingType::ProfessionalDev).unwrap(),
            "\"professional_dev\""
        );
        assert_eq!(
            serde_json::to_string(&CourseFormat::Hybrid).unwrap(),
            "\"hybrid\""
        );
    }
}
