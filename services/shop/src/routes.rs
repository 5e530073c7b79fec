//! Shop service routes

use axum::{
    Extension, Json, Router,
    extract::State,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::{ApiError, ApiResult},
    extract::JsonBody,
    middleware::{AuthUser, auth_middleware},
    models::NewOrder,
    state::AppState,
};

/// Request for user signup
#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request for user login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Create the router for the shop service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/users/me", get(current_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/signup/", post(signup))
        .route("/signup", post(signup))
        .route("/login/", post(login))
        .route("/login", post(login))
        .route("/orders/", post(create_order))
        .route("/orders", post(create_order))
        .route("/products/", get(list_products))
        .route("/products", get(list_products))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = match &state.db_pool {
        Some(pool) => match common::database::health_check(pool).await {
            Ok(true) => "ok",
            _ => "unreachable",
        },
        None => "memory",
    };
    let status = if database == "unreachable" {
        "degraded"
    } else {
        "ok"
    };

    Json(json!({
        "status": status,
        "service": "shop",
        "database": database,
    }))
}

/// User signup endpoint
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<SignupRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .accounts
        .signup(&payload.username, &payload.email, &payload.password)
        .await?;

    Ok(Json(user))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let token = state
        .accounts
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(token))
}

/// Order creation endpoint
pub async fn create_order(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<NewOrder>,
) -> ApiResult<impl IntoResponse> {
    let order = state.orders.create_order(payload).await?;

    Ok(Json(order))
}

/// Product listing endpoint
pub async fn list_products(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let products = state.products.list().await.map_err(|e| {
        tracing::error!("Failed to list products: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(products))
}

/// Current user endpoint
pub async fn current_user(Extension(AuthUser(user)): Extension<AuthUser>) -> impl IntoResponse {
    Json(user)
}
