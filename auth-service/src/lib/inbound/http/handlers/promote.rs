use auth::Role;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::credentials::models::AuthUser;
use crate::credentials::models::Principal;
use crate::credentials::models::UserId;
use crate::inbound::http::router::AppState;

pub async fn promote(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<i64>,
) -> Result<ApiSuccess<PromoteResponseData>, ApiError> {
    match &principal {
        Principal::Anonymous => {
            return Err(ApiError::Unauthorized("Authentication required".to_string()));
        }
        Principal::Authenticated(identity) => {
            if identity.role != Role::Admin {
                return Err(ApiError::Forbidden("Admin role required".to_string()));
            }
        }
    }

    state
        .auth_service
        .promote(UserId(user_id))
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromoteResponseData {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<&AuthUser> for PromoteResponseData {
    fn from(user: &AuthUser) -> Self {
        Self {
            user_id: user.id.0,
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            role: user.role,
        }
    }
}
