//! Patient and professional management service

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::holder::{CreatePatient, CreateProfessional, Patient, Professional, UpdatePatient},
    repository::Repository,
};

#[derive(Clone)]
pub struct HoldersService {
    repository: Repository,
}

impl HoldersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List patients
    pub async fn list_patients(&self) -> AppResult<Vec<Patient>> {
        self.repository.patients.list().await
    }

    /// Get patient by ID
    pub async fn get_patient(&self, id: Uuid) -> AppResult<Patient> {
        self.repository.patients.get_by_id(id).await
    }

    /// Admit a patient to the program
    pub async fn create_patient(&self, data: &CreatePatient) -> AppResult<Patient> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.patients.create(data).await
    }

    /// Update patient contact data
    pub async fn update_patient(&self, id: Uuid, data: &UpdatePatient) -> AppResult<Patient> {
        self.repository.patients.update(id, data).await
    }

    /// List professionals
    pub async fn list_professionals(&self) -> AppResult<Vec<Professional>> {
        self.repository.professionals.list().await
    }

    /// Get professional by ID
    pub async fn get_professional(&self, id: Uuid) -> AppResult<Professional> {
        self.repository.professionals.get_by_id(id).await
    }

    /// Create a professional
    pub async fn create_professional(
        &self,
        data: &CreateProfessional,
    ) -> AppResult<Professional> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.professionals.create(data).await
    }
}
