// ABOUTME: Shared API response types and error handling
// ABOUTME: Provides consistent response format across all API endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson, Response},
};
use serde::Serialize;

use canopy_ai::AiServiceError;
use canopy_auth::AuthError;
use canopy_products::ProductError;
use canopy_storage::StorageError;

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Unified handler error: wraps each layer's error enum so handlers can
/// use `?` across domains, with one deterministic status mapping.
#[derive(Debug)]
pub enum ApiError {
    Product(ProductError),
    Storage(StorageError),
    Auth(AuthError),
    Ai(AiServiceError),
    Conflict(String),
    Unauthorized(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<ProductError> for ApiError {
    fn from(err: ProductError) -> Self {
        ApiError::Product(err)
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Storage(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

impl From<AiServiceError> for ApiError {
    fn from(err: AiServiceError) -> Self {
        ApiError::Ai(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Product(err) => product_status(err),
            ApiError::Storage(err) => storage_status(err),
            ApiError::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::InvalidToken => {
                    (StatusCode::UNAUTHORIZED, err.to_string())
                }
                AuthError::NotApproved => (StatusCode::FORBIDDEN, err.to_string()),
                AuthError::Hash(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                ),
            },
            ApiError::Ai(err) => (StatusCode::BAD_GATEWAY, err.to_string()),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, message.clone()),
            ApiError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message.clone()),
        };

        error_response(status, message)
    }
}

fn product_status(err: &ProductError) -> (StatusCode, String) {
    match err {
        ProductError::NotFound => (StatusCode::NOT_FOUND, err.to_string()),
        ProductError::Forbidden(_) => (StatusCode::FORBIDDEN, err.to_string()),
        ProductError::InvalidInput(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        ProductError::InvalidOperation(_) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
        ProductError::Conflict(_) => (StatusCode::CONFLICT, err.to_string()),
        ProductError::Dependency(_) => (StatusCode::BAD_GATEWAY, err.to_string()),
        ProductError::Storage(inner) => storage_status(inner),
    }
}

fn storage_status(err: &StorageError) -> (StatusCode, String) {
    match err {
        StorageError::NotFound => (StatusCode::NOT_FOUND, err.to_string()),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Database error".to_string(),
        ),
    }
}

pub fn error_response(status: StatusCode, message: String) -> Response {
    (status, ResponseJson(ApiResponse::<()>::error(message))).into_response()
}
