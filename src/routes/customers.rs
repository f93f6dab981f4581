use axum::{Json, Router, extract::State, http::StatusCode, routing::post};

use crate::{
    dto::auth::{LoginRequest, LoginResponse, RegisterRequest},
    error::AppResult,
    models::Customer,
    response::ApiResponse,
    services::auth_service::{login_customer, register_customer},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[utoipa::path(
    post,
    path = "/api/customers/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Register customer", body = ApiResponse<Customer>),
        (status = 400, description = "Email already taken")
    ),
    tag = "Customers"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Customer>>)> {
    let resp = register_customer(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/customers/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login customer", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid password"),
        (status = 404, description = "Customer not found")
    ),
    tag = "Customers"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let resp = login_customer(&state.pool, payload).await?;
    Ok(Json(resp))
}
