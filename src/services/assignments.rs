//! Assignment ledger service
//!
//! Orchestrates holder eligibility and custodian scope before handing the
//! write to the transactional repository path.

use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        assignment::{Assignment, CreateAssignment, ReturnAssignment},
        enums::{EquipmentStatus, HolderKind, ProgramState},
        staff::StaffClaims,
    },
    repository::{assignments::NewAssignment, Repository},
};

#[derive(Clone)]
pub struct AssignmentsService {
    repository: Repository,
}

impl AssignmentsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Deliver a unit to a holder.
    ///
    /// Holder eligibility is checked here; availability, loan gate, and
    /// custodian scope are checked inside the create transaction against the
    /// locked equipment row.
    pub async fn create(
        &self,
        claims: &StaffClaims,
        req: &CreateAssignment,
    ) -> AppResult<Assignment> {
        match req.holder_kind {
            HolderKind::Patient => {
                let patient = self.repository.patients.get_by_id(req.holder_id).await?;
                if patient.program_state != ProgramState::Active {
                    return Err(AppError::PreconditionFailed(format!(
                        "Patient {} has exited the program",
                        patient.document_id
                    )));
                }
            }
            HolderKind::Professional => {
                self.repository
                    .professionals
                    .get_by_id(req.holder_id)
                    .await?;
            }
        }

        let assignment = self
            .repository
            .assignments
            .create(&NewAssignment {
                equipment_id: req.equipment_id,
                holder_id: req.holder_id,
                holder_kind: req.holder_kind,
                delivery_notes: req.delivery_notes.clone(),
                delivered_at: req.delivered_at.unwrap_or_else(Utc::now),
                delivery_payload: req.delivery_payload.clone(),
                custodian_scope: claims.custodian_scope(),
            })
            .await?;

        tracing::info!(
            acta = %assignment.display_number(),
            kind = %assignment.holder_kind,
            "Created assignment"
        );
        Ok(assignment)
    }

    /// Get assignment by ID
    pub async fn get(&self, id: Uuid) -> AppResult<Assignment> {
        self.repository.assignments.get_by_id(id).await
    }

    /// Return a unit, finalizing its assignment
    pub async fn return_assignment(
        &self,
        id: Uuid,
        req: &ReturnAssignment,
    ) -> AppResult<Assignment> {
        if req.final_condition == Some(EquipmentStatus::OnLoan) {
            return Err(AppError::Validation(
                "Final condition cannot be on_loan".to_string(),
            ));
        }
        let assignment = self.repository.assignments.finalize(id, req).await?;

        tracing::info!(acta = %assignment.display_number(), "Finalized assignment");
        Ok(assignment)
    }

    /// Assignments for a patient, newest first
    pub async fn list_for_patient(&self, patient_id: Uuid) -> AppResult<Vec<Assignment>> {
        self.repository.patients.get_by_id(patient_id).await?;
        self.repository
            .assignments
            .list_for_holder(patient_id, HolderKind::Patient)
            .await
    }

    /// Assignments for a professional, newest first
    pub async fn list_for_professional(
        &self,
        professional_id: Uuid,
    ) -> AppResult<Vec<Assignment>> {
        self.repository
            .professionals
            .get_by_id(professional_id)
            .await?;
        self.repository
            .assignments
            .list_for_holder(professional_id, HolderKind::Professional)
            .await
    }

    /// Mark a patient's program exit.
    ///
    /// Fails closed: returns false and writes nothing while any assignment
    /// for the patient is still active.
    pub async fn release_patient(&self, patient_id: Uuid) -> AppResult<bool> {
        let patient = self.repository.patients.get_by_id(patient_id).await?;
        if patient.program_state == ProgramState::Exited {
            return Err(AppError::PreconditionFailed(format!(
                "Patient {} already exited the program",
                patient.document_id
            )));
        }
        self.repository.patients.release(patient_id).await
    }
}
