// ABOUTME: HTTP request handlers for product-scoped tasks
// ABOUTME: Viewer access for reads, editor access for writes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use canopy_products::Role;
use canopy_tasks::{Task, TaskCreateInput, TaskUpdateInput};

use crate::auth::CurrentUser;
use crate::response::{ApiResponse, ApiResult};
use crate::state::AppState;

pub async fn list_tasks(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<Task>>>> {
    state
        .evaluator
        .evaluate(&current_user.id, &product_id, Role::Viewer)
        .await?;

    let tasks = state.task_storage.list_tasks(&product_id).await?;
    Ok(Json(ApiResponse::success(tasks)))
}

pub async fn get_task(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((product_id, task_id)): Path<(String, String)>,
) -> ApiResult<Json<ApiResponse<Task>>> {
    state
        .evaluator
        .evaluate(&current_user.id, &product_id, Role::Viewer)
        .await?;

    let task = fetch_scoped_task(&state, &product_id, &task_id).await?;
    Ok(Json(ApiResponse::success(task)))
}

pub async fn create_task(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<String>,
    Json(input): Json<TaskCreateInput>,
) -> ApiResult<impl IntoResponse> {
    state
        .evaluator
        .evaluate(&current_user.id, &product_id, Role::Editor)
        .await?;

    let task = state
        .task_storage
        .create_task(&product_id, &current_user.id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(task))))
}

pub async fn update_task(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((product_id, task_id)): Path<(String, String)>,
    Json(input): Json<TaskUpdateInput>,
) -> ApiResult<Json<ApiResponse<Task>>> {
    state
        .evaluator
        .evaluate(&current_user.id, &product_id, Role::Editor)
        .await?;

    fetch_scoped_task(&state, &product_id, &task_id).await?;

    let task = state.task_storage.update_task(&task_id, input).await?;
    Ok(Json(ApiResponse::success(task)))
}

pub async fn delete_task(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((product_id, task_id)): Path<(String, String)>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state
        .evaluator
        .evaluate(&current_user.id, &product_id, Role::Editor)
        .await?;

    fetch_scoped_task(&state, &product_id, &task_id).await?;

    state.task_storage.delete_task(&task_id).await?;
    Ok(Json(ApiResponse::success(())))
}

/// A task addressed through the wrong product is NotFound, so access on
/// one product never reaches into another's tasks.
async fn fetch_scoped_task(
    state: &AppState,
    product_id: &str,
    task_id: &str,
) -> ApiResult<Task> {
    let task = state.task_storage.get_task(task_id).await?;
    if task.product_id != product_id {
        return Err(canopy_storage::StorageError::NotFound.into());
    }
    Ok(task)
}
