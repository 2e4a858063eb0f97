//! Sequence allocation for human-facing document numbers

use sqlx::{Postgres, Transaction};

use crate::{error::AppResult, models::enums::HolderKind};

/// Allocates the next number in a logical series as stored-max + 1
/// (an empty series yields 1).
///
/// Numbering is monotonic and gap-tolerant. Allocation alone does not
/// guarantee uniqueness under concurrency: callers must run the allocation
/// and the dependent insert in the same transaction, and the per-series
/// unique indexes turn an allocation race into a unique violation that the
/// repositories surface as a retryable conflict.
pub struct SequenceAllocator;

impl SequenceAllocator {
    /// Next acta number in the given holder-kind series
    pub async fn next_assignment_number(
        tx: &mut Transaction<'_, Postgres>,
        kind: HolderKind,
    ) -> AppResult<i32> {
        let next: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(sequence_number), 0) + 1 FROM assignments WHERE holder_kind = $1",
        )
        .bind(kind)
        .fetch_one(&mut **tx)
        .await?;
        Ok(next)
    }

    /// Next internal-acta number for custody transfers
    pub async fn next_transfer_number(tx: &mut Transaction<'_, Postgres>) -> AppResult<i32> {
        let next: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(sequence_number), 0) + 1 FROM custody_transfers",
        )
        .fetch_one(&mut **tx)
        .await?;
        Ok(next)
    }

    /// Next number behind a human-facing equipment code
    pub async fn next_equipment_code_number(
        tx: &mut Transaction<'_, Postgres>,
    ) -> AppResult<i32> {
        let next: i32 =
            sqlx::query_scalar("SELECT COALESCE(MAX(code_number), 0) + 1 FROM equipment")
                .fetch_one(&mut **tx)
                .await?;
        Ok(next)
    }

    /// Next patient consecutivo
    pub async fn next_patient_number(tx: &mut Transaction<'_, Postgres>) -> AppResult<i32> {
        let next: i32 =
            sqlx::query_scalar("SELECT COALESCE(MAX(sequence_number), 0) + 1 FROM patients")
                .fetch_one(&mut **tx)
                .await?;
        Ok(next)
    }
}
