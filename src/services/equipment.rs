//! Equipment registry service

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        assignment::Assignment,
        enums::{EquipmentStatus, OwnershipType},
        equipment::{Equipment, EquipmentDetails, RegisterEquipment, UpdateEquipmentStatus},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
    code_prefix: String,
}

impl EquipmentService {
    pub fn new(repository: Repository, code_prefix: String) -> Self {
        Self {
            repository,
            code_prefix,
        }
    }

    /// List equipment with derived status, optionally filtered by it
    pub async fn list(
        &self,
        effective_status: Option<EquipmentStatus>,
    ) -> AppResult<Vec<EquipmentDetails>> {
        self.repository.equipment.list(effective_status).await
    }

    /// Get equipment with derived status
    pub async fn get(&self, id: Uuid) -> AppResult<EquipmentDetails> {
        self.repository.equipment.get_details(id).await
    }

    /// Register a new unit
    pub async fn register(&self, data: &RegisterEquipment) -> AppResult<Equipment> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if data.ownership == OwnershipType::ThirdParty && data.owner_contact.is_none() {
            return Err(AppError::Validation(
                "Third-party equipment requires an owner contact".to_string(),
            ));
        }

        if let Some(custodian_id) = data.custodian_id {
            self.repository.staff.get_by_id(custodian_id).await?;
        }

        let equipment = self
            .repository
            .equipment
            .register(data, &self.code_prefix)
            .await?;

        tracing::info!(code = %equipment.code, "Registered equipment");
        Ok(equipment)
    }

    /// Operator override of the intrinsic status (maintenance / retirement)
    pub async fn set_status(
        &self,
        id: Uuid,
        data: &UpdateEquipmentStatus,
    ) -> AppResult<Equipment> {
        if data.status == EquipmentStatus::OnLoan {
            return Err(AppError::Validation(
                "Status on_loan can only result from an assignment".to_string(),
            ));
        }
        self.repository.equipment.set_status(id, data.status).await
    }

    /// Full assignment history (hoja de vida) of a unit, newest first
    pub async fn history(&self, id: Uuid) -> AppResult<Vec<Assignment>> {
        // Resolve first so an unknown unit is a not-found, not an empty list
        self.repository.equipment.get_by_id(id).await?;
        self.repository.assignments.list_for_equipment(id).await
    }
}
