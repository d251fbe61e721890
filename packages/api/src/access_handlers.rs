// ABOUTME: HTTP request handlers for product access grants
// ABOUTME: Invite, list, role change, and revoke; all owner-gated except listing

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use canopy_products::{ProductAccess, Role};

use crate::auth::CurrentUser;
use crate::response::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct InviteRequest {
    pub user_id: String,
    pub role: String,
}

#[derive(Deserialize)]
pub struct RoleChangeRequest {
    pub role: String,
}

pub async fn list_grants(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<ProductAccess>>>> {
    let grants = state
        .evaluator
        .list_grants(&current_user.id, &product_id)
        .await?;
    Ok(Json(ApiResponse::success(grants)))
}

/// Invite a user onto a product with a role. Role literals are parsed at
/// the boundary so an unknown literal is a 400, not a deserialization error.
pub async fn invite(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<String>,
    Json(request): Json<InviteRequest>,
) -> ApiResult<impl IntoResponse> {
    let role: Role = request.role.parse()?;

    let grant = state
        .evaluator
        .invite(&current_user.id, &product_id, &request.user_id, role)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(grant))))
}

pub async fn update_role(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((product_id, user_id)): Path<(String, String)>,
    Json(request): Json<RoleChangeRequest>,
) -> ApiResult<Json<ApiResponse<ProductAccess>>> {
    let role: Role = request.role.parse()?;

    let grant = state
        .evaluator
        .update_role(&current_user.id, &product_id, &user_id, role)
        .await?;
    Ok(Json(ApiResponse::success(grant)))
}

pub async fn revoke(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((product_id, user_id)): Path<(String, String)>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state
        .evaluator
        .revoke(&current_user.id, &product_id, &user_id)
        .await?;
    Ok(Json(ApiResponse::success(())))
}
