//! Patient and professional repositories

use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::sequences::SequenceAllocator;
use crate::{
    error::{AppError, AppResult},
    models::holder::{CreatePatient, CreateProfessional, Patient, Professional, UpdatePatient},
};

#[derive(Clone)]
pub struct PatientsRepository {
    pool: Pool<Postgres>,
}

impl PatientsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all patients, newest admissions first
    pub async fn list(&self) -> AppResult<Vec<Patient>> {
        let rows =
            sqlx::query_as::<_, Patient>("SELECT * FROM patients ORDER BY admitted_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    /// Get patient by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Patient> {
        sqlx::query_as::<_, Patient>("SELECT * FROM patients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Patient {} not found", id)))
    }

    /// Admit a patient, allocating the next consecutivo in one transaction
    pub async fn create(&self, data: &CreatePatient) -> AppResult<Patient> {
        let mut tx = self.pool.begin().await?;

        let sequence_number = SequenceAllocator::next_patient_number(&mut tx).await?;

        let patient = sqlx::query_as::<_, Patient>(
            r#"
            INSERT INTO patients (
                id, sequence_number, document_id, full_name, phone, address,
                diagnosis, program_state, admitted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'active', $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(sequence_number)
        .bind(&data.document_id)
        .bind(&data.full_name)
        .bind(&data.phone)
        .bind(&data.address)
        .bind(&data.diagnosis)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if AppError::is_unique_violation(&e, "patients_document_id_key") {
                AppError::Conflict(format!(
                    "Patient with document {} already exists",
                    data.document_id
                ))
            } else if AppError::is_unique_violation(&e, "patients_sequence_number_idx") {
                AppError::Conflict("Patient number allocation raced, retry".to_string())
            } else {
                e.into()
            }
        })?;

        tx.commit().await?;
        Ok(patient)
    }

    /// Update patient contact data
    pub async fn update(&self, id: Uuid, data: &UpdatePatient) -> AppResult<Patient> {
        sqlx::query_as::<_, Patient>(
            r#"
            UPDATE patients
            SET full_name = COALESCE($2, full_name),
                phone = COALESCE($3, phone),
                address = COALESCE($4, address),
                diagnosis = COALESCE($5, diagnosis)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.full_name)
        .bind(&data.phone)
        .bind(&data.address)
        .bind(&data.diagnosis)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Patient {} not found", id)))
    }

    /// Mark program exit, failing closed while the patient holds equipment.
    ///
    /// The active-assignment check and the state flip are one conditional
    /// UPDATE: either the patient has nothing out on loan and exits, or the
    /// statement matches no row and nothing is written.
    pub async fn release(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE patients
            SET program_state = 'exited', exited_at = $2
            WHERE id = $1
              AND program_state = 'active'
              AND NOT EXISTS (
                  SELECT 1 FROM assignments
                  WHERE holder_id = $1
                    AND holder_kind = 'patient'
                    AND state = 'active'
              )
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Clone)]
pub struct ProfessionalsRepository {
    pool: Pool<Postgres>,
}

impl ProfessionalsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all professionals by name
    pub async fn list(&self) -> AppResult<Vec<Professional>> {
        let rows =
            sqlx::query_as::<_, Professional>("SELECT * FROM professionals ORDER BY full_name")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    /// Get professional by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Professional> {
        sqlx::query_as::<_, Professional>("SELECT * FROM professionals WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Professional {} not found", id)))
    }

    /// Create professional
    pub async fn create(&self, data: &CreateProfessional) -> AppResult<Professional> {
        sqlx::query_as::<_, Professional>(
            r#"
            INSERT INTO professionals (id, document_id, full_name, specialty, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.document_id)
        .bind(&data.full_name)
        .bind(&data.specialty)
        .bind(&data.phone)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if AppError::is_unique_violation(&e, "professionals_document_id_key") {
                AppError::Conflict(format!(
                    "Professional with document {} already exists",
                    data.document_id
                ))
            } else {
                e.into()
            }
        })
    }
}
