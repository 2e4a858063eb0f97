//! Custody transfer (internal acta) endpoints
//!
//! These are the privileged operations of the system: the role checks run
//! server-side and any error response means no state changed.

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
        custody::{
            AcceptCustodyTransfer, CreateCustodyTransfer, CustodyTransfer,
            CustodyTransferDetails,
        },
        enums::TransferState,
    },
};

use super::AuthenticatedStaff;

/// Transfer list filter
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct TransferQuery {
    /// Filter by transfer state
    pub state: Option<TransferState>,
}

/// List custody transfers
#[utoipa::path(
    get,
    path = "/custody-transfers",
    tag = "custody",
    security(("bearer_auth" = [])),
    params(TransferQuery),
    responses(
        (status = 200, description = "Custody transfers, newest first", body = Vec<CustodyTransfer>)
    )
)]
pub async fn list_transfers(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Query(query): Query<TransferQuery>,
) -> AppResult<Json<Vec<CustodyTransfer>>> {
    let transfers = state.services.custody.list(query.state).await?;
    Ok(Json(transfers))
}

/// Get a custody transfer with its item snapshots
#[utoipa::path(
    get,
    path = "/custody-transfers/{id}",
    tag = "custody",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Transfer ID")),
    responses(
        (status = 200, description = "Custody transfer", body = CustodyTransferDetails),
        (status = 404, description = "Transfer not found")
    )
)]
pub async fn get_transfer(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CustodyTransferDetails>> {
    let transfer = state.services.custody.get(id).await?;
    Ok(Json(transfer))
}

/// Create a custody transfer, locking every referenced unit.
///
/// All-or-nothing: if any unit is unknown or already pending, no unit is
/// locked and no transfer is created.
#[utoipa::path(
    post,
    path = "/custody-transfers",
    tag = "custody",
    security(("bearer_auth" = [])),
    request_body = CreateCustodyTransfer,
    responses(
        (status = 201, description = "Transfer created, units locked", body = CustodyTransferDetails),
        (status = 400, description = "Invalid item list or missing signature"),
        (status = 403, description = "Caller is not a technical custodian"),
        (status = 404, description = "Receiver or equipment not found"),
        (status = 422, description = "Receiver lacks role or a unit is already pending")
    )
)]
pub async fn create_transfer(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(claims): AuthenticatedStaff,
    Json(request): Json<CreateCustodyTransfer>,
) -> AppResult<(StatusCode, Json<CustodyTransferDetails>)> {
    claims.require_technical_custodian()?;

    let transfer = state.services.custody.create(&claims, &request).await?;
    Ok((StatusCode::CREATED, Json(transfer)))
}

/// Accept a custody transfer as its designated receiver.
///
/// All-or-nothing: the transfer flips to accepted and every unit is
/// released to the receiver in the same transaction.
#[utoipa::path(
    post,
    path = "/custody-transfers/{id}/accept",
    tag = "custody",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Transfer ID")),
    request_body = AcceptCustodyTransfer,
    responses(
        (status = 200, description = "Transfer accepted, units released", body = CustodyTransferDetails),
        (status = 400, description = "Missing signature"),
        (status = 403, description = "Caller is not the designated receiver"),
        (status = 404, description = "Transfer not found"),
        (status = 422, description = "Transfer is not awaiting acceptance")
    )
)]
pub async fn accept_transfer(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(claims): AuthenticatedStaff,
    Path(id): Path<Uuid>,
    Json(request): Json<AcceptCustodyTransfer>,
) -> AppResult<Json<CustodyTransferDetails>> {
    let transfer = state.services.custody.accept(&claims, id, &request).await?;
    Ok(Json(transfer))
}
