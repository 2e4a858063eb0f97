//! Staff repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{enums::StaffRole, staff::Staff},
};

#[derive(Clone)]
pub struct StaffRepository {
    pool: Pool<Postgres>,
}

impl StaffRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all staff accounts
    pub async fn list(&self) -> AppResult<Vec<Staff>> {
        let rows = sqlx::query_as::<_, Staff>("SELECT * FROM staff ORDER BY login")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get staff by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Staff> {
        sqlx::query_as::<_, Staff>("SELECT * FROM staff WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Staff {} not found", id)))
    }

    /// Get staff by login, if any
    pub async fn get_by_login(&self, login: &str) -> AppResult<Option<Staff>> {
        let staff = sqlx::query_as::<_, Staff>("SELECT * FROM staff WHERE login = $1")
            .bind(login)
            .fetch_optional(&self.pool)
            .await?;
        Ok(staff)
    }

    /// Create a staff account
    pub async fn create(
        &self,
        login: &str,
        full_name: &str,
        role: StaffRole,
        password_hash: &str,
    ) -> AppResult<Staff> {
        sqlx::query_as::<_, Staff>(
            r#"
            INSERT INTO staff (id, login, full_name, role, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(login)
        .bind(full_name)
        .bind(role)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if AppError::is_unique_violation(&e, "staff_login_key") {
                AppError::Conflict(format!("Staff login {} already exists", login))
            } else {
                e.into()
            }
        })
    }

    /// Count staff accounts (used for first-run bootstrap)
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM staff")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
