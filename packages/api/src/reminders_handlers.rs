// ABOUTME: HTTP request handlers for user-owned reminders
// ABOUTME: Ownership-checked CRUD plus a due listing

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use canopy_products::Role;
use canopy_reminders::{Reminder, ReminderCreateInput, ReminderUpdateInput};
use canopy_storage::StorageError;

use crate::auth::CurrentUser;
use crate::response::{ApiResponse, ApiResult};
use crate::state::AppState;

pub async fn list_reminders(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> ApiResult<Json<ApiResponse<Vec<Reminder>>>> {
    let reminders = state.reminder_storage.list_reminders(&current_user.id).await?;
    Ok(Json(ApiResponse::success(reminders)))
}

pub async fn list_due_reminders(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> ApiResult<Json<ApiResponse<Vec<Reminder>>>> {
    let reminders = state
        .reminder_storage
        .list_due_reminders(&current_user.id, Utc::now())
        .await?;
    Ok(Json(ApiResponse::success(reminders)))
}

/// Create a reminder. Linking it to a product or a task requires viewer
/// access on that product at creation time.
pub async fn create_reminder(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<ReminderCreateInput>,
) -> ApiResult<impl IntoResponse> {
    if let Some(product_id) = &input.product_id {
        state
            .evaluator
            .evaluate(&current_user.id, product_id, Role::Viewer)
            .await?;
    }

    if let Some(task_id) = &input.task_id {
        let task = state.task_storage.get_task(task_id).await?;
        // A task link outside the linked product is treated as a missing task.
        if let Some(product_id) = &input.product_id {
            if task.product_id != *product_id {
                return Err(StorageError::NotFound.into());
            }
        }
        state
            .evaluator
            .evaluate(&current_user.id, &task.product_id, Role::Viewer)
            .await?;
    }

    let reminder = state
        .reminder_storage
        .create_reminder(&current_user.id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(reminder))))
}

pub async fn get_reminder(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(reminder_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Reminder>>> {
    let reminder = fetch_owned_reminder(&state, &current_user.id, &reminder_id).await?;
    Ok(Json(ApiResponse::success(reminder)))
}

pub async fn update_reminder(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(reminder_id): Path<String>,
    Json(input): Json<ReminderUpdateInput>,
) -> ApiResult<Json<ApiResponse<Reminder>>> {
    fetch_owned_reminder(&state, &current_user.id, &reminder_id).await?;

    let reminder = state
        .reminder_storage
        .update_reminder(&reminder_id, input)
        .await?;
    Ok(Json(ApiResponse::success(reminder)))
}

pub async fn delete_reminder(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(reminder_id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    fetch_owned_reminder(&state, &current_user.id, &reminder_id).await?;

    state.reminder_storage.delete_reminder(&reminder_id).await?;
    Ok(Json(ApiResponse::success(())))
}

/// Another user's reminder is reported as NotFound, never as Forbidden.
async fn fetch_owned_reminder(
    state: &AppState,
    user_id: &str,
    reminder_id: &str,
) -> ApiResult<Reminder> {
    let reminder = state.reminder_storage.get_reminder(reminder_id).await?;
    if reminder.user_id != user_id {
        return Err(StorageError::NotFound.into());
    }
    Ok(reminder)
}
