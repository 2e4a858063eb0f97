//! Assignment ledger repository
//!
//! All loan/return writes happen here, inside single transactions. The
//! at-most-one-active-assignment rule is enforced twice: by checking the
//! derived status while holding a row lock on the equipment, and by the
//! partial unique index `assignments_one_active_per_equipment` that catches
//! anything the lock discipline might miss.

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

use super::sequences::SequenceAllocator;
use crate::{
    error::{AppError, AppResult},
    models::{
        assignment::{Assignment, ReturnAssignment},
        enums::{AssignmentState, EquipmentStatus, HolderKind},
        equipment::{Equipment, LoanState},
    },
};

/// Validated input for a ledger insert, assembled by the service layer
#[derive(Debug)]
pub struct NewAssignment {
    pub equipment_id: Uuid,
    pub holder_id: Uuid,
    pub holder_kind: HolderKind,
    pub delivery_notes: Option<String>,
    pub delivered_at: DateTime<Utc>,
    pub delivery_payload: Option<serde_json::Value>,
    /// When set, the equipment's custodian must be unset or equal to this
    /// staff id (scoped-custodian callers)
    pub custodian_scope: Option<Uuid>,
}

const LOAN_STATE_SQL: &str = r#"
    SELECT EXISTS(
               SELECT 1 FROM assignments
               WHERE equipment_id = $1 AND state = 'active'
           ) AS has_active_assignment,
           (
               SELECT final_condition FROM assignments
               WHERE equipment_id = $1
                 AND state = 'finalized'
                 AND final_condition IS NOT NULL
               ORDER BY returned_at DESC, delivered_at DESC
               LIMIT 1
           ) AS last_reported_condition
"#;

#[derive(Clone)]
pub struct AssignmentsRepository {
    pool: Pool<Postgres>,
}

impl AssignmentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get assignment by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Assignment> {
        sqlx::query_as::<_, Assignment>("SELECT * FROM assignments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Assignment {} not found", id)))
    }

    /// Full audit trail for a unit, newest first
    pub async fn list_for_equipment(&self, equipment_id: Uuid) -> AppResult<Vec<Assignment>> {
        let rows = sqlx::query_as::<_, Assignment>(
            "SELECT * FROM assignments WHERE equipment_id = $1
             ORDER BY delivered_at DESC, created_at DESC",
        )
        .bind(equipment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Assignments held by a holder, newest first
    pub async fn list_for_holder(
        &self,
        holder_id: Uuid,
        kind: HolderKind,
    ) -> AppResult<Vec<Assignment>> {
        let rows = sqlx::query_as::<_, Assignment>(
            "SELECT * FROM assignments WHERE holder_id = $1 AND holder_kind = $2
             ORDER BY delivered_at DESC, created_at DESC",
        )
        .bind(holder_id)
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Loan-history facts for one unit, for read paths
    pub async fn loan_state(&self, equipment_id: Uuid) -> AppResult<LoanState> {
        let (has_active_assignment, last_reported_condition): (bool, Option<EquipmentStatus>) =
            sqlx::query_as(LOAN_STATE_SQL)
                .bind(equipment_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(LoanState {
            has_active_assignment,
            last_reported_condition,
        })
    }

    async fn loan_state_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        equipment_id: Uuid,
    ) -> AppResult<LoanState> {
        let (has_active_assignment, last_reported_condition): (bool, Option<EquipmentStatus>) =
            sqlx::query_as(LOAN_STATE_SQL)
                .bind(equipment_id)
                .fetch_one(&mut **tx)
                .await?;
        Ok(LoanState {
            has_active_assignment,
            last_reported_condition,
        })
    }

    /// Create an assignment (deliver a unit to a holder).
    ///
    /// Runs as one transaction: the equipment row is locked, the loan gates
    /// and the derived status are checked against the locked row, the acta
    /// number is allocated, and the row is inserted. Either everything
    /// commits or nothing does.
    pub async fn create(&self, new: &NewAssignment) -> AppResult<Assignment> {
        let mut tx = self.pool.begin().await?;

        let equipment =
            sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1 FOR UPDATE")
                .bind(new.equipment_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("Equipment {} not found", new.equipment_id))
                })?;

        if !equipment.loan_gate_open || equipment.pending_transfer_id.is_some() {
            return Err(AppError::PreconditionFailed(format!(
                "Loan gate closed for equipment {}: custody transfer pending acceptance",
                equipment.code
            )));
        }

        if let Some(scope) = new.custodian_scope {
            if let Some(custodian) = equipment.custodian_id {
                if custodian != scope {
                    return Err(AppError::PreconditionFailed(format!(
                        "Equipment {} is held by another custodian",
                        equipment.code
                    )));
                }
            }
        }

        let loan = Self::loan_state_in_tx(&mut tx, equipment.id).await?;
        let effective = equipment.effective_status(&loan);
        if effective != EquipmentStatus::Available {
            return Err(AppError::PreconditionFailed(format!(
                "Equipment {} is not available (currently {})",
                equipment.code, effective
            )));
        }

        let sequence_number =
            SequenceAllocator::next_assignment_number(&mut tx, new.holder_kind).await?;

        let assignment = sqlx::query_as::<_, Assignment>(
            r#"
            INSERT INTO assignments (
                id, sequence_number, holder_kind, equipment_id, holder_id,
                state, delivered_at, delivery_notes, delivery_payload
            )
            VALUES ($1, $2, $3, $4, $5, 'active', $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(sequence_number)
        .bind(new.holder_kind)
        .bind(new.equipment_id)
        .bind(new.holder_id)
        .bind(new.delivered_at)
        .bind(&new.delivery_notes)
        .bind(new.delivery_payload.as_ref().map(sqlx::types::Json))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if AppError::is_unique_violation(&e, "assignments_one_active_per_equipment") {
                AppError::Conflict(format!(
                    "Equipment {} was assigned concurrently, retry",
                    equipment.code
                ))
            } else if AppError::is_unique_violation(&e, "assignments_series_number_idx") {
                AppError::Conflict("Acta number allocation raced, retry".to_string())
            } else {
                e.into()
            }
        })?;

        tx.commit().await?;
        Ok(assignment)
    }

    /// Finalize an assignment (return of the unit).
    ///
    /// Guards against double-return: only an active assignment can be
    /// finalized, and the transition is terminal.
    pub async fn finalize(&self, id: Uuid, req: &ReturnAssignment) -> AppResult<Assignment> {
        let mut tx = self.pool.begin().await?;

        let current =
            sqlx::query_as::<_, Assignment>("SELECT * FROM assignments WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Assignment {} not found", id)))?;

        if current.state != AssignmentState::Active {
            return Err(AppError::PreconditionFailed(format!(
                "Assignment {} is already finalized",
                current.display_number()
            )));
        }

        let assignment = sqlx::query_as::<_, Assignment>(
            r#"
            UPDATE assignments
            SET state = 'finalized', returned_at = $2, return_notes = $3,
                final_condition = $4, return_payload = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .bind(&req.return_notes)
        .bind(req.final_condition)
        .bind(req.return_payload.as_ref().map(sqlx::types::Json))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(assignment)
    }

    /// Count a holder's active assignments
    pub async fn count_active_for_holder(
        &self,
        holder_id: Uuid,
        kind: HolderKind,
    ) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM assignments
             WHERE holder_id = $1 AND holder_kind = $2 AND state = 'active'",
        )
        .bind(holder_id)
        .bind(kind)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
