// ABOUTME: HTTP request handlers for customer interviews and interview templates
// ABOUTME: Interviews are product-scoped; templates belong to the calling user

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use canopy_interviews::{
    CustomerInterview, InterviewCreateInput, InterviewTemplate, InterviewUpdateInput,
    TemplateCreateInput, TemplateUpdateInput,
};
use canopy_products::Role;
use canopy_storage::StorageError;

use crate::auth::CurrentUser;
use crate::response::{ApiResponse, ApiResult};
use crate::state::AppState;

pub async fn list_interviews(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<CustomerInterview>>>> {
    state
        .evaluator
        .evaluate(&current_user.id, &product_id, Role::Viewer)
        .await?;

    let interviews = state.interview_storage.list_interviews(&product_id).await?;
    Ok(Json(ApiResponse::success(interviews)))
}

pub async fn get_interview(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((product_id, interview_id)): Path<(String, String)>,
) -> ApiResult<Json<ApiResponse<CustomerInterview>>> {
    state
        .evaluator
        .evaluate(&current_user.id, &product_id, Role::Viewer)
        .await?;

    let interview = fetch_scoped_interview(&state, &product_id, &interview_id).await?;
    Ok(Json(ApiResponse::success(interview)))
}

pub async fn create_interview(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<String>,
    Json(input): Json<InterviewCreateInput>,
) -> ApiResult<impl IntoResponse> {
    state
        .evaluator
        .evaluate(&current_user.id, &product_id, Role::Editor)
        .await?;

    let interview = state
        .interview_storage
        .create_interview(&product_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(interview))))
}

pub async fn update_interview(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((product_id, interview_id)): Path<(String, String)>,
    Json(input): Json<InterviewUpdateInput>,
) -> ApiResult<Json<ApiResponse<CustomerInterview>>> {
    state
        .evaluator
        .evaluate(&current_user.id, &product_id, Role::Editor)
        .await?;

    fetch_scoped_interview(&state, &product_id, &interview_id).await?;

    let interview = state
        .interview_storage
        .update_interview(&interview_id, input)
        .await?;
    Ok(Json(ApiResponse::success(interview)))
}

pub async fn delete_interview(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((product_id, interview_id)): Path<(String, String)>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state
        .evaluator
        .evaluate(&current_user.id, &product_id, Role::Editor)
        .await?;

    fetch_scoped_interview(&state, &product_id, &interview_id).await?;

    state.interview_storage.delete_interview(&interview_id).await?;
    Ok(Json(ApiResponse::success(())))
}

async fn fetch_scoped_interview(
    state: &AppState,
    product_id: &str,
    interview_id: &str,
) -> ApiResult<CustomerInterview> {
    let interview = state.interview_storage.get_interview(interview_id).await?;
    if interview.product_id != product_id {
        return Err(StorageError::NotFound.into());
    }
    Ok(interview)
}

// Templates are user-owned; no product gate, only ownership.

pub async fn list_templates(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> ApiResult<Json<ApiResponse<Vec<InterviewTemplate>>>> {
    let templates = state.template_storage.list_templates(&current_user.id).await?;
    Ok(Json(ApiResponse::success(templates)))
}

pub async fn create_template(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<TemplateCreateInput>,
) -> ApiResult<impl IntoResponse> {
    let template = state
        .template_storage
        .create_template(&current_user.id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(template))))
}

pub async fn get_template(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(template_id): Path<String>,
) -> ApiResult<Json<ApiResponse<InterviewTemplate>>> {
    let template = fetch_owned_template(&state, &current_user.id, &template_id).await?;
    Ok(Json(ApiResponse::success(template)))
}

pub async fn update_template(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(template_id): Path<String>,
    Json(input): Json<TemplateUpdateInput>,
) -> ApiResult<Json<ApiResponse<InterviewTemplate>>> {
    fetch_owned_template(&state, &current_user.id, &template_id).await?;

    let template = state
        .template_storage
        .update_template(&template_id, input)
        .await?;
    Ok(Json(ApiResponse::success(template)))
}

pub async fn delete_template(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(template_id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    fetch_owned_template(&state, &current_user.id, &template_id).await?;

    state.template_storage.delete_template(&template_id).await?;
    Ok(Json(ApiResponse::success(())))
}

/// Another user's template is reported as NotFound, never as Forbidden.
async fn fetch_owned_template(
    state: &AppState,
    user_id: &str,
    template_id: &str,
) -> ApiResult<InterviewTemplate> {
    let template = state.template_storage.get_template(template_id).await?;
    if template.user_id != user_id {
        return Err(StorageError::NotFound.into());
    }
    Ok(template)
}
