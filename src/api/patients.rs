//! Patient management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        assignment::Assignment,
        holder::{CreatePatient, Patient, UpdatePatient},
    },
};

use super::AuthenticatedStaff;

/// Program release response
#[derive(Serialize, ToSchema)]
pub struct ReleaseResponse {
    pub released: bool,
}

/// List patients
#[utoipa::path(
    get,
    path = "/patients",
    tag = "patients",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Patients", body = Vec<Patient>)
    )
)]
pub async fn list_patients(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
) -> AppResult<Json<Vec<Patient>>> {
    let patients = state.services.holders.list_patients().await?;
    Ok(Json(patients))
}

/// Get patient by ID
#[utoipa::path(
    get,
    path = "/patients/{id}",
    tag = "patients",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Patient ID")),
    responses(
        (status = 200, description = "Patient", body = Patient),
        (status = 404, description = "Patient not found")
    )
)]
pub async fn get_patient(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Patient>> {
    let patient = state.services.holders.get_patient(id).await?;
    Ok(Json(patient))
}

/// Admit a patient
#[utoipa::path(
    post,
    path = "/patients",
    tag = "patients",
    security(("bearer_auth" = [])),
    request_body = CreatePatient,
    responses(
        (status = 201, description = "Patient admitted", body = Patient),
        (status = 409, description = "Document already registered")
    )
)]
pub async fn create_patient(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(claims): AuthenticatedStaff,
    Json(data): Json<CreatePatient>,
) -> AppResult<(StatusCode, Json<Patient>)> {
    claims.require_loan_officer()?;
    let patient = state.services.holders.create_patient(&data).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

/// Update patient contact data
#[utoipa::path(
    put,
    path = "/patients/{id}",
    tag = "patients",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Patient ID")),
    request_body = UpdatePatient,
    responses(
        (status = 200, description = "Patient updated", body = Patient),
        (status = 404, description = "Patient not found")
    )
)]
pub async fn update_patient(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(claims): AuthenticatedStaff,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdatePatient>,
) -> AppResult<Json<Patient>> {
    claims.require_loan_officer()?;
    let patient = state.services.holders.update_patient(id, &data).await?;
    Ok(Json(patient))
}

/// Mark a patient's program exit.
///
/// Fails while the patient still holds equipment: every active assignment
/// must be returned first.
#[utoipa::path(
    post,
    path = "/patients/{id}/release",
    tag = "patients",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Patient ID")),
    responses(
        (status = 200, description = "Patient released", body = ReleaseResponse),
        (status = 404, description = "Patient not found"),
        (status = 422, description = "Patient still holds equipment")
    )
)]
pub async fn release_patient(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(claims): AuthenticatedStaff,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ReleaseResponse>> {
    claims.require_loan_officer()?;
    let released = state.services.assignments.release_patient(id).await?;
    if !released {
        return Err(AppError::PreconditionFailed(
            "Patient still holds equipment on active assignments".to_string(),
        ));
    }
    Ok(Json(ReleaseResponse { released }))
}

/// Assignments for a patient
#[utoipa::path(
    get,
    path = "/patients/{id}/assignments",
    tag = "patients",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Patient ID")),
    responses(
        (status = 200, description = "Patient's assignments, newest first", body = Vec<Assignment>),
        (status = 404, description = "Patient not found")
    )
)]
pub async fn patient_assignments(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Assignment>>> {
    let assignments = state.services.assignments.list_for_patient(id).await?;
    Ok(Json(assignments))
}
