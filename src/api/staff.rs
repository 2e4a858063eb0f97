//! Staff management endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::staff::{CreateStaff, Staff},
};

use super::AuthenticatedStaff;

/// List staff accounts
#[utoipa::path(
    get,
    path = "/staff",
    tag = "staff",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Staff accounts", body = Vec<Staff>)
    )
)]
pub async fn list_staff(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(claims): AuthenticatedStaff,
) -> AppResult<Json<Vec<Staff>>> {
    claims.require_admin()?;
    let staff = state.services.auth.list_staff().await?;
    Ok(Json(staff))
}

/// Create a staff account
#[utoipa::path(
    post,
    path = "/staff",
    tag = "staff",
    security(("bearer_auth" = [])),
    request_body = CreateStaff,
    responses(
        (status = 201, description = "Staff account created", body = Staff),
        (status = 409, description = "Login already exists")
    )
)]
pub async fn create_staff(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(claims): AuthenticatedStaff,
    Json(data): Json<CreateStaff>,
) -> AppResult<(StatusCode, Json<Staff>)> {
    claims.require_admin()?;
    let staff = state.services.auth.create_staff(&data).await?;
    Ok((StatusCode::CREATED, Json(staff)))
}
