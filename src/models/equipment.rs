//! Equipment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::enums::{EquipmentStatus, OwnershipType};

/// Owner contact for third-party units
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OwnerContact {
    pub name: String,
    pub document_id: Option<String>,
    pub phone: Option<String>,
}

/// Equipment record
///
/// `status` is the intrinsic status. The operational status shown to callers
/// is always derived through [`Equipment::effective_status`]; it is never
/// stored, so there is a single source of truth for loan state.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Equipment {
    pub id: Uuid,
    /// Human-facing code (PREFIX-###), immutable once assigned
    pub code: String,
    /// Monotonic number behind the code
    pub code_number: i32,
    pub name: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub description: Option<String>,
    pub ownership: OwnershipType,
    /// Owner contact, present for third-party units
    #[schema(value_type = Option<OwnerContact>)]
    pub owner_contact: Option<sqlx::types::Json<OwnerContact>>,
    pub status: EquipmentStatus,
    /// Staff member holding technical custody; absent for legacy records
    pub custodian_id: Option<Uuid>,
    /// Closed while the unit sits in an unaccepted custody transfer
    pub loan_gate_open: bool,
    /// In-flight custody transfer locking this unit, if any
    pub pending_transfer_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Loan-history facts a status resolution needs, computed per query
#[derive(Debug, Clone, Copy, Default)]
pub struct LoanState {
    /// Whether any assignment for the unit is currently active
    pub has_active_assignment: bool,
    /// Condition reported by the most recent finalized assignment that
    /// reported one (latest `returned_at`, ties broken by `delivered_at`)
    pub last_reported_condition: Option<EquipmentStatus>,
}

impl Equipment {
    /// Derive the operational status of the unit.
    ///
    /// An active assignment forces `OnLoan` regardless of the stored status.
    /// Otherwise the most recently reported post-return condition wins, and
    /// only when no finalized assignment ever reported one does the stored
    /// intrinsic status apply.
    pub fn effective_status(&self, loan: &LoanState) -> EquipmentStatus {
        if loan.has_active_assignment {
            return EquipmentStatus::OnLoan;
        }
        loan.last_reported_condition.unwrap_or(self.status)
    }
}

/// Equipment with its derived operational status, for API responses
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EquipmentDetails {
    #[serde(flatten)]
    pub equipment: Equipment,
    pub effective_status: EquipmentStatus,
}

impl EquipmentDetails {
    pub fn new(equipment: Equipment, loan: &LoanState) -> Self {
        let effective_status = equipment.effective_status(loan);
        Self {
            equipment,
            effective_status,
        }
    }
}

/// Register equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterEquipment {
    #[validate(length(min = 1, message = "name must not be blank"))]
    pub name: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub description: Option<String>,
    pub ownership: OwnershipType,
    /// Required when ownership is third_party
    pub owner_contact: Option<OwnerContact>,
    /// Optional technical custodian holding the unit from registration on
    pub custodian_id: Option<Uuid>,
}

/// Operator status override request (maintenance / retirement)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEquipmentStatus {
    pub status: EquipmentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(status: EquipmentStatus) -> Equipment {
        Equipment {
            id: Uuid::new_v4(),
            code: "BM-001".to_string(),
            code_number: 1,
            name: "Oxygen concentrator".to_string(),
            brand: None,
            model: None,
            serial_number: None,
            description: None,
            ownership: OwnershipType::Owned,
            owner_contact: None,
            status,
            custodian_id: None,
            loan_gate_open: true,
            pending_transfer_id: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn active_assignment_forces_on_loan() {
        let loan = LoanState {
            has_active_assignment: true,
            last_reported_condition: Some(EquipmentStatus::Maintenance),
        };
        assert_eq!(
            unit(EquipmentStatus::Available).effective_status(&loan),
            EquipmentStatus::OnLoan
        );
    }

    #[test]
    fn last_reported_condition_wins_over_stored_status() {
        let loan = LoanState {
            has_active_assignment: false,
            last_reported_condition: Some(EquipmentStatus::Maintenance),
        };
        assert_eq!(
            unit(EquipmentStatus::Available).effective_status(&loan),
            EquipmentStatus::Maintenance
        );
    }

    #[test]
    fn stored_status_applies_when_history_is_silent() {
        let loan = LoanState::default();
        assert_eq!(
            unit(EquipmentStatus::Retired).effective_status(&loan),
            EquipmentStatus::Retired
        );
        assert_eq!(
            unit(EquipmentStatus::Available).effective_status(&loan),
            EquipmentStatus::Available
        );
    }
}
