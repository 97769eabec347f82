use auth::Role;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::credentials::models::AuthenticatedIdentity;
use crate::inbound::http::router::AppState;

pub async fn validate(
    State(state): State<AppState>,
    Json(body): Json<ValidateRequestBody>,
) -> Result<ApiSuccess<ValidateResponseData>, ApiError> {
    state
        .auth_service
        .validate_access(&body.token)
        .await
        .map_err(ApiError::from)
        .map(|ref identity| ApiSuccess::new(StatusCode::OK, identity.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ValidateRequestBody {
    token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidateResponseData {
    pub valid: bool,
    pub user_id: i64,
    pub role: Role,
}

impl From<&AuthenticatedIdentity> for ValidateResponseData {
    fn from(identity: &AuthenticatedIdentity) -> Self {
        Self {
            valid: true,
            user_id: identity.user_id.0,
            role: identity.role,
        }
    }
}
