//! Equipment repository for database operations

use chrono::Utc;
use sqlx::{FromRow, Pool, Postgres};
use uuid::Uuid;

use super::sequences::SequenceAllocator;
use crate::{
    error::{AppError, AppResult},
    models::{
        enums::EquipmentStatus,
        equipment::{Equipment, EquipmentDetails, LoanState, RegisterEquipment},
    },
};

/// Equipment row joined with the loan-history facts the status resolution
/// needs. The facts are recomputed on every query; nothing derived is stored.
#[derive(FromRow)]
struct EquipmentLoanRow {
    #[sqlx(flatten)]
    equipment: Equipment,
    has_active_assignment: bool,
    last_reported_condition: Option<EquipmentStatus>,
}

impl EquipmentLoanRow {
    fn into_details(self) -> EquipmentDetails {
        let loan = LoanState {
            has_active_assignment: self.has_active_assignment,
            last_reported_condition: self.last_reported_condition,
        };
        EquipmentDetails::new(self.equipment, &loan)
    }
}

const DETAILS_SELECT: &str = r#"
    SELECT e.*,
           EXISTS(
               SELECT 1 FROM assignments a
               WHERE a.equipment_id = e.id AND a.state = 'active'
           ) AS has_active_assignment,
           (
               SELECT a.final_condition FROM assignments a
               WHERE a.equipment_id = e.id
                 AND a.state = 'finalized'
                 AND a.final_condition IS NOT NULL
               ORDER BY a.returned_at DESC, a.delivered_at DESC
               LIMIT 1
           ) AS last_reported_condition
    FROM equipment e
"#;

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: Pool<Postgres>,
}

impl EquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all equipment with derived status, optionally filtered by it
    pub async fn list(
        &self,
        effective_status: Option<EquipmentStatus>,
    ) -> AppResult<Vec<EquipmentDetails>> {
        let rows = sqlx::query_as::<_, EquipmentLoanRow>(&format!(
            "{} ORDER BY e.code_number",
            DETAILS_SELECT
        ))
        .fetch_all(&self.pool)
        .await?;

        let details = rows
            .into_iter()
            .map(EquipmentLoanRow::into_details)
            .filter(|d| effective_status.map_or(true, |s| d.effective_status == s))
            .collect();
        Ok(details)
    }

    /// Get equipment with derived status by ID
    pub async fn get_details(&self, id: Uuid) -> AppResult<EquipmentDetails> {
        let row = sqlx::query_as::<_, EquipmentLoanRow>(&format!(
            "{} WHERE e.id = $1",
            DETAILS_SELECT
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))?;
        Ok(row.into_details())
    }

    /// Get the raw equipment record by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Register a new unit, allocating the next human code in its series.
    ///
    /// Code allocation and the insert run in one transaction; a concurrent
    /// registration that races the same number surfaces as a conflict.
    pub async fn register(
        &self,
        data: &RegisterEquipment,
        code_prefix: &str,
    ) -> AppResult<Equipment> {
        let mut tx = self.pool.begin().await?;

        let code_number = SequenceAllocator::next_equipment_code_number(&mut tx).await?;
        let code = format!("{}-{:03}", code_prefix, code_number);

        let equipment = sqlx::query_as::<_, Equipment>(
            r#"
            INSERT INTO equipment (
                id, code, code_number, name, brand, model, serial_number,
                description, ownership, owner_contact, status, custodian_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'available', $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&code)
        .bind(code_number)
        .bind(&data.name)
        .bind(&data.brand)
        .bind(&data.model)
        .bind(&data.serial_number)
        .bind(&data.description)
        .bind(data.ownership)
        .bind(data.owner_contact.as_ref().map(sqlx::types::Json))
        .bind(data.custodian_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if AppError::is_unique_violation(&e, "equipment_code_number_idx") {
                AppError::Conflict("Equipment code allocation raced, retry".to_string())
            } else {
                e.into()
            }
        })?;

        tx.commit().await?;
        Ok(equipment)
    }

    /// Operator override of the intrinsic status (maintenance / retirement).
    ///
    /// The on_loan value is rejected upstream: that transition only ever
    /// happens as a derived effect of an active assignment.
    pub async fn set_status(&self, id: Uuid, status: EquipmentStatus) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>(
            "UPDATE equipment SET status = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }
}
