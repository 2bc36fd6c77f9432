use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{error::ApiError, handlers::AppState, Result};

/// Gate for the financial routes: requires `Authorization: Bearer <token>`
/// matching the configured token. With no token configured the gate is
/// open, which is only meant for local development.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    let Some(expected) = state.api_token.as_deref() else {
        return Ok(next.run(request).await);
    };

    let supplied = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match supplied {
        Some(token) if token == expected => Ok(next.run(request).await),
        _ => Err(ApiError::Unauthorized),
    }
}
