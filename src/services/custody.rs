//! Custody transfer workflow service

use std::collections::HashSet;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        custody::{
            AcceptCustodyTransfer, CreateCustodyTransfer, CustodyTransfer,
            CustodyTransferDetails, MAX_TRANSFER_ITEMS,
        },
        enums::{StaffRole, TransferState},
        staff::StaffClaims,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CustodyService {
    repository: Repository,
}

impl CustodyService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a transfer, locking every referenced unit.
    ///
    /// Validation and the receiver-role check run before any write; the
    /// per-unit pending check and the locks are applied atomically by the
    /// repository.
    pub async fn create(
        &self,
        claims: &StaffClaims,
        req: &CreateCustodyTransfer,
    ) -> AppResult<CustodyTransferDetails> {
        if req.sender_signature.trim().is_empty() {
            return Err(AppError::Validation(
                "Sender signature is required".to_string(),
            ));
        }
        if req.equipment_ids.is_empty() || req.equipment_ids.len() > MAX_TRANSFER_ITEMS {
            return Err(AppError::Validation(format!(
                "A custody transfer takes between 1 and {} units",
                MAX_TRANSFER_ITEMS
            )));
        }
        let unique: HashSet<Uuid> = req.equipment_ids.iter().copied().collect();
        if unique.len() != req.equipment_ids.len() {
            return Err(AppError::Validation(
                "Duplicate equipment ids in transfer".to_string(),
            ));
        }

        let receiver = self.repository.staff.get_by_id(req.receiver_id).await?;
        if receiver.role != StaffRole::Administrative {
            return Err(AppError::PreconditionFailed(format!(
                "Receiver {} lacks the administrative role",
                receiver.login
            )));
        }

        let details = self
            .repository
            .custody
            .create_ticket(
                claims.staff_id,
                receiver.id,
                &req.equipment_ids,
                &req.sender_signature,
                req.notes.as_deref(),
            )
            .await?;

        tracing::info!(
            acta = %details.transfer.display_number(),
            units = details.items.len(),
            "Created custody transfer"
        );
        Ok(details)
    }

    /// Accept a transfer as its designated receiver
    pub async fn accept(
        &self,
        claims: &StaffClaims,
        id: Uuid,
        req: &AcceptCustodyTransfer,
    ) -> AppResult<CustodyTransferDetails> {
        if req.receiver_signature.trim().is_empty() {
            return Err(AppError::Validation(
                "Receiver signature is required".to_string(),
            ));
        }

        let details = self
            .repository
            .custody
            .accept_ticket(id, claims.staff_id, &req.receiver_signature)
            .await?;

        tracing::info!(
            acta = %details.transfer.display_number(),
            units = details.items.len(),
            "Accepted custody transfer"
        );
        Ok(details)
    }

    /// List transfers, optionally filtered by state
    pub async fn list(&self, state: Option<TransferState>) -> AppResult<Vec<CustodyTransfer>> {
        self.repository.custody.list(state).await
    }

    /// Get a transfer with its item snapshots
    pub async fn get(&self, id: Uuid) -> AppResult<CustodyTransferDetails> {
        self.repository.custody.get_details(id).await
    }
}
