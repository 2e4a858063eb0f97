//! Professional management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        assignment::Assignment,
        holder::{CreateProfessional, Professional},
    },
};

use super::AuthenticatedStaff;

/// List professionals
#[utoipa::path(
    get,
    path = "/professionals",
    tag = "professionals",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Professionals", body = Vec<Professional>)
    )
)]
pub async fn list_professionals(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
) -> AppResult<Json<Vec<Professional>>> {
    let professionals = state.services.holders.list_professionals().await?;
    Ok(Json(professionals))
}

/// Get professional by ID
#[utoipa::path(
    get,
    path = "/professionals/{id}",
    tag = "professionals",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Professional ID")),
    responses(
        (status = 200, description = "Professional", body = Professional),
        (status = 404, description = "Professional not found")
    )
)]
pub async fn get_professional(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Professional>> {
    let professional = state.services.holders.get_professional(id).await?;
    Ok(Json(professional))
}

/// Create a professional
#[utoipa::path(
    post,
    path = "/professionals",
    tag = "professionals",
    security(("bearer_auth" = [])),
    request_body = CreateProfessional,
    responses(
        (status = 201, description = "Professional created", body = Professional),
        (status = 409, description = "Document already registered")
    )
)]
pub async fn create_professional(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(claims): AuthenticatedStaff,
    Json(data): Json<CreateProfessional>,
) -> AppResult<(StatusCode, Json<Professional>)> {
    claims.require_loan_officer()?;
    let professional = state.services.holders.create_professional(&data).await?;
    Ok((StatusCode::CREATED, Json(professional)))
}

/// Assignments for a professional
#[utoipa::path(
    get,
    path = "/professionals/{id}/assignments",
    tag = "professionals",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Professional ID")),
    responses(
        (status = 200, description = "Professional's assignments, newest first", body = Vec<Assignment>),
        (status = 404, description = "Professional not found")
    )
)]
pub async fn professional_assignments(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Assignment>>> {
    let assignments = state
        .services
        .assignments
        .list_for_professional(id)
        .await?;
    Ok(Json(assignments))
}
