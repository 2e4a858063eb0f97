//! Holder models: home-care patients and staff professionals

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::enums::ProgramState;

/// Home-care patient
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Patient {
    pub id: Uuid,
    /// Per-series consecutivo assigned at admission
    pub sequence_number: i32,
    /// National document id
    pub document_id: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub diagnosis: Option<String>,
    pub program_state: ProgramState,
    pub admitted_at: DateTime<Utc>,
    pub exited_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Staff professional eligible to hold equipment
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Professional {
    pub id: Uuid,
    pub document_id: String,
    pub full_name: String,
    pub specialty: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Admit patient request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePatient {
    #[validate(length(min = 1, message = "document_id must not be blank"))]
    pub document_id: String,
    #[validate(length(min = 1, message = "full_name must not be blank"))]
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub diagnosis: Option<String>,
}

/// Update patient request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePatient {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub diagnosis: Option<String>,
}

/// Create professional request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProfessional {
    #[validate(length(min = 1, message = "document_id must not be blank"))]
    pub document_id: String,
    #[validate(length(min = 1, message = "full_name must not be blank"))]
    pub full_name: String,
    pub specialty: Option<String>,
    pub phone: Option<String>,
}
