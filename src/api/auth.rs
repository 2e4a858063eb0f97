//! Authentication endpoints

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::enums::StaffRole,
};

use super::AuthenticatedStaff;

/// Login request
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

/// Login response
#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub staff: StaffInfo,
}

/// Authenticated staff summary
#[derive(Serialize, ToSchema)]
pub struct StaffInfo {
    pub id: Uuid,
    pub login: String,
    pub full_name: String,
    pub role: StaffRole,
}

/// Authenticate and obtain a JWT token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (token, staff) = state
        .services
        .auth
        .authenticate(&request.login, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        staff: StaffInfo {
            id: staff.id,
            login: staff.login,
            full_name: staff.full_name,
            role: staff.role,
        },
    }))
}

/// Get the authenticated staff account
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current staff account", body = StaffInfo),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(claims): AuthenticatedStaff,
) -> AppResult<Json<StaffInfo>> {
    let staff = state.services.auth.current_staff(&claims).await?;
    Ok(Json(StaffInfo {
        id: staff.id,
        login: staff.login,
        full_name: staff.full_name,
        role: staff.role,
    }))
}
