//! Middleware for bearer token validation

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use tracing::warn;

use crate::{error::ApiError, models::UserResponse, state::AppState};

/// User resolved from the request's bearer token
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserResponse);

/// Validate the `Authorization: Bearer` header and attach the user to the request
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let bearer = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(ApiError::Unauthorized)?;

    let user = state
        .accounts
        .authenticate(bearer.token())
        .await
        .map_err(|e| {
            warn!("Rejected bearer token: {}", e);
            ApiError::from(e)
        })?;

    req.extensions_mut().insert(AuthUser(user));

    Ok(next.run(req).await)
}
