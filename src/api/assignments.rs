//! Assignment (delivery/return acta) endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::assignment::{Assignment, CreateAssignment, ReturnAssignment},
};

use super::AuthenticatedStaff;

/// Assignment response with the printable acta number
#[derive(Serialize, ToSchema)]
pub struct AssignmentResponse {
    /// Zero-padded acta number
    pub display_number: String,
    #[serde(flatten)]
    pub assignment: Assignment,
}

impl From<Assignment> for AssignmentResponse {
    fn from(assignment: Assignment) -> Self {
        Self {
            display_number: assignment.display_number(),
            assignment,
        }
    }
}

/// Deliver a unit to a holder
#[utoipa::path(
    post,
    path = "/assignments",
    tag = "assignments",
    security(("bearer_auth" = [])),
    request_body = CreateAssignment,
    responses(
        (status = 201, description = "Assignment created", body = AssignmentResponse),
        (status = 404, description = "Equipment or holder not found"),
        (status = 409, description = "Concurrent assignment detected"),
        (status = 422, description = "Equipment not loanable or holder not eligible")
    )
)]
pub async fn create_assignment(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(claims): AuthenticatedStaff,
    Json(request): Json<CreateAssignment>,
) -> AppResult<(StatusCode, Json<AssignmentResponse>)> {
    claims.require_loan_officer()?;

    let assignment = state.services.assignments.create(&claims, &request).await?;
    Ok((StatusCode::CREATED, Json(assignment.into())))
}

/// Get assignment by ID
#[utoipa::path(
    get,
    path = "/assignments/{id}",
    tag = "assignments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment", body = AssignmentResponse),
        (status = 404, description = "Assignment not found")
    )
)]
pub async fn get_assignment(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AssignmentResponse>> {
    let assignment = state.services.assignments.get(id).await?;
    Ok(Json(assignment.into()))
}

/// Return a unit, finalizing its assignment
#[utoipa::path(
    post,
    path = "/assignments/{id}/return",
    tag = "assignments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Assignment ID")),
    request_body = ReturnAssignment,
    responses(
        (status = 200, description = "Assignment finalized", body = AssignmentResponse),
        (status = 404, description = "Assignment not found"),
        (status = 422, description = "Assignment already finalized")
    )
)]
pub async fn return_assignment(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(claims): AuthenticatedStaff,
    Path(id): Path<Uuid>,
    Json(request): Json<ReturnAssignment>,
) -> AppResult<Json<AssignmentResponse>> {
    claims.require_loan_officer()?;

    let assignment = state
        .services
        .assignments
        .return_assignment(id, &request)
        .await?;
    Ok(Json(assignment.into()))
}
