// ABOUTME: HTTP request handlers for signup and login
// ABOUTME: Argon2 verification and JWT issuance at the boundary

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::info;

use canopy_auth::{hash_password, verify_password, AuthError};
use canopy_users::{User, UserCreateInput};

use crate::response::{ApiError, ApiResponse, ApiResult};
use crate::state::AppState;

const TOKEN_LIFETIME_HOURS: i64 = 24;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub timezone: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Create a new account. Accounts start unapproved and cannot log in
/// until approved.
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> ApiResult<impl IntoResponse> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::Product(
            canopy_products::ProductError::InvalidInput(
                "email and password are required".to_string(),
            ),
        ));
    }

    if state
        .user_storage
        .get_user_by_email(&request.email)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("email already registered".to_string()));
    }

    let password_hash = hash_password(&request.password)?;

    let user = state
        .user_storage
        .create_user(UserCreateInput {
            email: request.email,
            password_hash,
            display_name: request.display_name,
            timezone: request.timezone,
        })
        .await?;

    info!("New signup: {} ({})", user.email, user.id);

    Ok((StatusCode::CREATED, Json(ApiResponse::success(user))))
}

/// Verify credentials and issue a JWT. Unapproved accounts are rejected.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    let user = state
        .user_storage
        .get_user_by_email(&request.email)
        .await?
        .ok_or(ApiError::Auth(AuthError::InvalidCredentials))?;

    if !verify_password(&request.password, &user.password_hash)? {
        return Err(ApiError::Auth(AuthError::InvalidCredentials));
    }

    if !user.approved {
        return Err(ApiError::Auth(AuthError::NotApproved));
    }

    let token = state
        .jwt
        .generate_token(&user.id, Duration::hours(TOKEN_LIFETIME_HOURS))?;

    info!("User logged in: {}", user.id);

    Ok(Json(ApiResponse::success(LoginResponse { token, user })))
}
