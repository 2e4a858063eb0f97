//! Custody transfer repository
//!
//! Both workflow operations are single atomic batches: the ticket write and
//! every per-unit lock/unlock commit together or not at all. A partially
//! locked batch would leave units loanable to nobody, so there is no
//! non-transactional path through this module.

use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::sequences::SequenceAllocator;
use crate::{
    error::{AppError, AppResult},
    models::{
        custody::{CustodyTransfer, CustodyTransferDetails, CustodyTransferItem},
        enums::TransferState,
        equipment::Equipment,
    },
};

#[derive(Clone)]
pub struct CustodyRepository {
    pool: Pool<Postgres>,
}

impl CustodyRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get transfer by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<CustodyTransfer> {
        sqlx::query_as::<_, CustodyTransfer>("SELECT * FROM custody_transfers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Custody transfer {} not found", id)))
    }

    /// Get transfer with its item snapshots
    pub async fn get_details(&self, id: Uuid) -> AppResult<CustodyTransferDetails> {
        let transfer = self.get_by_id(id).await?;
        let items = sqlx::query_as::<_, CustodyTransferItem>(
            "SELECT * FROM custody_transfer_items WHERE transfer_id = $1 ORDER BY position",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(CustodyTransferDetails { transfer, items })
    }

    /// List transfers, newest first, optionally filtered by state
    pub async fn list(&self, state: Option<TransferState>) -> AppResult<Vec<CustodyTransfer>> {
        let rows = match state {
            Some(state) => {
                sqlx::query_as::<_, CustodyTransfer>(
                    "SELECT * FROM custody_transfers WHERE state = $1 ORDER BY created_at DESC",
                )
                .bind(state)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, CustodyTransfer>(
                    "SELECT * FROM custody_transfers ORDER BY created_at DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    /// Create a transfer and lock every referenced unit, all-or-nothing.
    ///
    /// Equipment rows are locked in id order so two concurrent transfers
    /// over overlapping batches serialize instead of deadlocking. If any
    /// unit is missing or already pending, nothing is written.
    pub async fn create_ticket(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
        equipment_ids: &[Uuid],
        sender_signature: &str,
        notes: Option<&str>,
    ) -> AppResult<CustodyTransferDetails> {
        let mut tx = self.pool.begin().await?;

        let units = sqlx::query_as::<_, Equipment>(
            "SELECT * FROM equipment WHERE id = ANY($1) ORDER BY id FOR UPDATE",
        )
        .bind(equipment_ids)
        .fetch_all(&mut *tx)
        .await?;

        if units.len() != equipment_ids.len() {
            let found: Vec<Uuid> = units.iter().map(|u| u.id).collect();
            let missing = equipment_ids
                .iter()
                .find(|id| !found.contains(id))
                .copied()
                .unwrap_or_default();
            return Err(AppError::NotFound(format!(
                "Equipment {} not found",
                missing
            )));
        }

        for unit in &units {
            if unit.pending_transfer_id.is_some() {
                return Err(AppError::PreconditionFailed(format!(
                    "Equipment {} is already part of a pending custody transfer",
                    unit.code
                )));
            }
        }

        let sequence_number = SequenceAllocator::next_transfer_number(&mut tx).await?;
        let transfer_id = Uuid::new_v4();

        let transfer = sqlx::query_as::<_, CustodyTransfer>(
            r#"
            INSERT INTO custody_transfers (
                id, sequence_number, sender_id, receiver_id, state,
                sender_signature, notes
            )
            VALUES ($1, $2, $3, $4, 'sent', $5, $6)
            RETURNING *
            "#,
        )
        .bind(transfer_id)
        .bind(sequence_number)
        .bind(sender_id)
        .bind(receiver_id)
        .bind(sender_signature)
        .bind(notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if AppError::is_unique_violation(&e, "custody_transfers_sequence_number_idx") {
                AppError::Conflict("Internal acta number allocation raced, retry".to_string())
            } else {
                e.into()
            }
        })?;

        // snapshot in the caller's order; the lock order above stays by id
        let by_id: std::collections::HashMap<Uuid, &Equipment> =
            units.iter().map(|u| (u.id, u)).collect();

        let mut items = Vec::with_capacity(units.len());
        for (position, equipment_id) in equipment_ids.iter().enumerate() {
            let unit = by_id[equipment_id];
            let item = sqlx::query_as::<_, CustodyTransferItem>(
                r#"
                INSERT INTO custody_transfer_items (
                    id, transfer_id, equipment_id, position, code, name,
                    brand, model, serial_number
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(transfer_id)
            .bind(unit.id)
            .bind(position as i32)
            .bind(&unit.code)
            .bind(&unit.name)
            .bind(&unit.brand)
            .bind(&unit.model)
            .bind(&unit.serial_number)
            .fetch_one(&mut *tx)
            .await?;
            items.push(item);
        }

        sqlx::query(
            r#"
            UPDATE equipment
            SET loan_gate_open = FALSE, custodian_id = $2,
                pending_transfer_id = $3, updated_at = $4
            WHERE id = ANY($1)
            "#,
        )
        .bind(equipment_ids)
        .bind(sender_id)
        .bind(transfer_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(CustodyTransferDetails { transfer, items })
    }

    /// Accept a transfer: flip it to accepted and release every unit to the
    /// receiver, all-or-nothing.
    pub async fn accept_ticket(
        &self,
        id: Uuid,
        caller_id: Uuid,
        receiver_signature: &str,
    ) -> AppResult<CustodyTransferDetails> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, CustodyTransfer>(
            "SELECT * FROM custody_transfers WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Custody transfer {} not found", id)))?;

        if current.state != TransferState::Sent {
            return Err(AppError::PreconditionFailed(format!(
                "Custody transfer {} is not awaiting acceptance",
                current.display_number()
            )));
        }

        if current.receiver_id != caller_id {
            return Err(AppError::PermissionDenied(
                "Only the designated receiver can accept this transfer".to_string(),
            ));
        }

        let items = sqlx::query_as::<_, CustodyTransferItem>(
            "SELECT * FROM custody_transfer_items WHERE transfer_id = $1 ORDER BY position",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        if items.is_empty() || items.len() > crate::models::custody::MAX_TRANSFER_ITEMS {
            return Err(AppError::PreconditionFailed(format!(
                "Custody transfer {} has an invalid item count",
                current.display_number()
            )));
        }

        let transfer = sqlx::query_as::<_, CustodyTransfer>(
            r#"
            UPDATE custody_transfers
            SET state = 'accepted', receiver_signature = $2, accepted_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(receiver_signature)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE equipment
            SET loan_gate_open = TRUE, custodian_id = $2,
                pending_transfer_id = NULL, updated_at = $3
            WHERE pending_transfer_id = $1
            "#,
        )
        .bind(id)
        .bind(current.receiver_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(CustodyTransferDetails { transfer, items })
    }
}
