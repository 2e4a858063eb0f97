//! Equipment API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        assignment::Assignment,
        enums::EquipmentStatus,
        equipment::{Equipment, EquipmentDetails, RegisterEquipment, UpdateEquipmentStatus},
    },
};

use super::AuthenticatedStaff;

/// Equipment list filter
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EquipmentQuery {
    /// Filter by derived operational status
    pub status: Option<EquipmentStatus>,
}

/// List equipment with derived status
#[utoipa::path(
    get,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(EquipmentQuery),
    responses(
        (status = 200, description = "Equipment list", body = Vec<EquipmentDetails>)
    )
)]
pub async fn list_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Query(query): Query<EquipmentQuery>,
) -> AppResult<Json<Vec<EquipmentDetails>>> {
    let equipment = state.services.equipment.list(query.status).await?;
    Ok(Json(equipment))
}

/// Get equipment by ID
#[utoipa::path(
    get,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment details", body = EquipmentDetails),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn get_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EquipmentDetails>> {
    let equipment = state.services.equipment.get(id).await?;
    Ok(Json(equipment))
}

/// Register new equipment
#[utoipa::path(
    post,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    request_body = RegisterEquipment,
    responses(
        (status = 201, description = "Equipment registered", body = Equipment),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn register_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(claims): AuthenticatedStaff,
    Json(data): Json<RegisterEquipment>,
) -> AppResult<(StatusCode, Json<Equipment>)> {
    claims.require_inventory_write()?;
    let equipment = state.services.equipment.register(&data).await?;
    Ok((StatusCode::CREATED, Json(equipment)))
}

/// Override the intrinsic equipment status (maintenance / retirement)
#[utoipa::path(
    put,
    path = "/equipment/{id}/status",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Equipment ID")),
    request_body = UpdateEquipmentStatus,
    responses(
        (status = 200, description = "Status updated", body = Equipment),
        (status = 400, description = "on_loan cannot be set directly"),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn update_equipment_status(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(claims): AuthenticatedStaff,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateEquipmentStatus>,
) -> AppResult<Json<Equipment>> {
    claims.require_inventory_write()?;
    let equipment = state.services.equipment.set_status(id, &data).await?;
    Ok(Json(equipment))
}

/// Full assignment history of a unit (hoja de vida)
#[utoipa::path(
    get,
    path = "/equipment/{id}/assignments",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Assignment history, newest first", body = Vec<Assignment>),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn equipment_history(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Assignment>>> {
    let history = state.services.equipment.history(id).await?;
    Ok(Json(history))
}
