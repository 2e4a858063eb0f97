//! Assignment (delivery/return acta) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::enums::{AssignmentState, EquipmentStatus, HolderKind};

/// A loan-and-return transaction between a unit and a holder.
///
/// Assignments are never deleted: the finalized rows are the unit's
/// permanent audit trail. Sequence numbers run per holder kind.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Assignment {
    pub id: Uuid,
    pub sequence_number: i32,
    pub holder_kind: HolderKind,
    pub equipment_id: Uuid,
    pub holder_id: Uuid,
    pub state: AssignmentState,
    pub delivered_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub delivery_notes: Option<String>,
    pub return_notes: Option<String>,
    /// Post-return condition reported on finalization; feeds the effective
    /// status of the unit for all subsequent reads
    pub final_condition: Option<EquipmentStatus>,
    /// Captured signatures / actor names at delivery, carried opaque
    #[schema(value_type = Option<Object>)]
    pub delivery_payload: Option<sqlx::types::Json<serde_json::Value>>,
    /// Captured signatures / actor names at return, carried opaque
    #[schema(value_type = Option<Object>)]
    pub return_payload: Option<sqlx::types::Json<serde_json::Value>>,
    pub created_at: DateTime<Utc>,
}

impl Assignment {
    /// Zero-padded display number for the printed acta
    pub fn display_number(&self) -> String {
        format!("{:04}", self.sequence_number)
    }
}

/// Create assignment request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAssignment {
    pub equipment_id: Uuid,
    pub holder_id: Uuid,
    pub holder_kind: HolderKind,
    pub delivery_notes: Option<String>,
    /// Delivery timestamp; defaults to now
    pub delivered_at: Option<DateTime<Utc>>,
    /// Opaque signature/actor payload captured by the UI
    pub delivery_payload: Option<serde_json::Value>,
}

/// Return (finalize) assignment request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReturnAssignment {
    pub return_notes: Option<String>,
    /// Condition of the unit as observed at return
    pub final_condition: Option<EquipmentStatus>,
    /// Opaque signature/actor payload captured by the UI
    pub return_payload: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_number_is_zero_padded_to_four_digits() {
        let mut assignment = Assignment {
            id: Uuid::new_v4(),
            sequence_number: 7,
            holder_kind: HolderKind::Patient,
            equipment_id: Uuid::new_v4(),
            holder_id: Uuid::new_v4(),
            state: AssignmentState::Active,
            delivered_at: Utc::now(),
            returned_at: None,
            delivery_notes: None,
            return_notes: None,
            final_condition: None,
            delivery_payload: None,
            return_payload: None,
            created_at: Utc::now(),
        };
        assert_eq!(assignment.display_number(), "0007");

        assignment.sequence_number = 12345;
        assert_eq!(assignment.display_number(), "12345");
    }
}
