// ABOUTME: Authentication context for API requests
// ABOUTME: Resolves the Bearer JWT into an approved user id

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::Response,
};
use tracing::{debug, error};

use canopy_storage::StorageError;

use crate::response::error_response;
use crate::state::AppState;

/// Current authenticated user
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| {
                error_response(
                    StatusCode::UNAUTHORIZED,
                    "Missing bearer token".to_string(),
                )
            })?;

        let claims = state.jwt.verify_token(token).map_err(|_| {
            debug!("Rejected request with invalid token");
            error_response(
                StatusCode::UNAUTHORIZED,
                "Invalid or expired token".to_string(),
            )
        })?;

        let user = match state.user_storage.get_user(&claims.sub).await {
            Ok(user) => user,
            // Tokens for deleted accounts are indistinguishable from stale ones.
            Err(StorageError::NotFound) => {
                debug!("Rejected token for unknown user {}", claims.sub);
                return Err(error_response(
                    StatusCode::UNAUTHORIZED,
                    "Invalid or expired token".to_string(),
                ));
            }
            Err(e) => {
                error!("Failed to load user {}: {}", claims.sub, e);
                return Err(error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                ));
            }
        };

        if !user.approved {
            return Err(error_response(
                StatusCode::FORBIDDEN,
                "Account pending approval".to_string(),
            ));
        }

        Ok(Self { id: user.id })
    }
}
