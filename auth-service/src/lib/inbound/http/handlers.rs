use auth::Role;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::credentials::errors::AuthError;
use crate::credentials::models::TokenBundle;

pub mod login;
pub mod promote;
pub mod refresh;
pub mod register;
pub mod validate;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::UserNotFound { .. } => ApiError::NotFound(err.to_string()),
            AuthError::UsernameTaken(_) | AuthError::EmailTaken(_) => {
                ApiError::Conflict(err.to_string())
            }
            AuthError::LoginFailed | AuthError::AccessRejected | AuthError::RefreshRejected => {
                ApiError::Unauthorized(err.to_string())
            }
            AuthError::TokenValidationFailed => ApiError::BadRequest(err.to_string()),
            AuthError::InvalidUsername(_) | AuthError::InvalidEmail(_) => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            AuthError::PasswordHash(_) | AuthError::DatabaseError(_) | AuthError::Unknown(_) => {
                // internals are logged, never sent to the caller
                tracing::error!(error = %err, "Internal error");
                ApiError::InternalServerError("Unexpected error".to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Token pair response shared by the login and refresh handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenResponseData {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<&TokenBundle> for TokenResponseData {
    fn from(bundle: &TokenBundle) -> Self {
        Self {
            access_token: bundle.access_token.clone(),
            refresh_token: bundle.refresh_token.clone(),
            token_type: bundle.token_type.to_string(),
            user_id: bundle.user_id.0,
            username: bundle.username.clone(),
            email: bundle.email.clone(),
            role: bundle.role,
        }
    }
}
