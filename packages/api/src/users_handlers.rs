// ABOUTME: HTTP request handlers for user profile operations
// ABOUTME: Current-user lookup, profile edits, and account approval

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use canopy_users::{User, UserProfileUpdate};

use crate::auth::CurrentUser;
use crate::response::{ApiResponse, ApiResult};
use crate::state::AppState;

pub async fn get_current_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> ApiResult<Json<ApiResponse<User>>> {
    let user = state.user_storage.get_user(&current_user.id).await?;
    Ok(Json(ApiResponse::success(user)))
}

pub async fn update_profile(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(update): Json<UserProfileUpdate>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let user = state
        .user_storage
        .update_profile(&current_user.id, update)
        .await?;
    Ok(Json(ApiResponse::success(user)))
}

/// Approve a pending account. Any approved user can approve others;
/// there is no separate admin role.
pub async fn approve_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<String>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let user = state.user_storage.approve_user(&user_id).await?;
    info!("User {} approved by {}", user_id, current_user.id);
    Ok(Json(ApiResponse::success(user)))
}
