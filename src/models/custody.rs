//! Custody transfer (internal acta) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::enums::TransferState;

/// Upper bound on units per transfer, enforced before any write
pub const MAX_TRANSFER_ITEMS: usize = 200;

/// Two-phase handoff of units from a technical custodian to an
/// administrative receiver. While sent, every referenced unit has its loan
/// gate closed and points back at this transfer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CustodyTransfer {
    pub id: Uuid,
    pub sequence_number: i32,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub state: TransferState,
    /// Opaque sender signature captured at creation
    pub sender_signature: String,
    /// Opaque receiver signature captured at acceptance
    pub receiver_signature: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
}

impl CustodyTransfer {
    /// Zero-padded display number for the printed internal acta
    pub fn display_number(&self) -> String {
        format!("{:04}", self.sequence_number)
    }
}

/// Equipment snapshot captured at transfer-creation time.
///
/// Descriptive fields are denormalized so the printed acta keeps showing
/// what was handed over even if the unit record changes later.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CustodyTransferItem {
    pub id: Uuid,
    pub transfer_id: Uuid,
    pub equipment_id: Uuid,
    pub position: i32,
    pub code: String,
    pub name: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
}

/// Transfer with its item snapshots, for API responses
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CustodyTransferDetails {
    #[serde(flatten)]
    pub transfer: CustodyTransfer,
    pub items: Vec<CustodyTransferItem>,
}

/// Create custody transfer request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCustodyTransfer {
    pub receiver_id: Uuid,
    pub equipment_ids: Vec<Uuid>,
    /// Opaque sender signature (required)
    pub sender_signature: String,
    pub notes: Option<String>,
}

/// Accept custody transfer request
#[derive(Debug, Deserialize, ToSchema)]
pub struct AcceptCustodyTransfer {
    /// Opaque receiver signature (required)
    pub receiver_signature: String,
}
