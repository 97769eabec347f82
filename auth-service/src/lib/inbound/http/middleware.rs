use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::Response;

use crate::credentials::models::Principal;
use crate::inbound::http::router::AppState;

/// Middleware deriving the request's [`Principal`].
///
/// A missing `Authorization` header or a non-`Bearer` scheme means "no
/// credential supplied", and a token that fails validation is treated the
/// same way: the request proceeds as `Anonymous` and capability-gated
/// handlers decide whether that is acceptable.
pub async fn resolve_principal(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let principal = match bearer_token(&req) {
        Some(token) => match state.auth_service.validate_access(token).await {
            Ok(identity) => Principal::Authenticated(identity),
            Err(e) => {
                tracing::warn!(error = %e, "Bearer token rejected");
                Principal::Anonymous
            }
        },
        None => Principal::Anonymous,
    };

    req.extensions_mut().insert(principal);
    next.run(req).await
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
