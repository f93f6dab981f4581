use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::cart::{AddToCartRequest, CartDetail},
    error::AppResult,
    middleware::auth::AuthCustomer,
    models::Cart,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_cart))
        .route("/add_to_cart", post(add_to_cart))
}

#[utoipa::path(
    get,
    path = "/api/carts",
    responses(
        (status = 200, description = "The current customer's cart", body = ApiResponse<CartDetail>),
        (status = 404, description = "No cart exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Carts"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    customer: AuthCustomer,
) -> AppResult<Json<ApiResponse<CartDetail>>> {
    let resp = cart_service::get_cart(&state, &customer).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/carts/add_to_cart",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Cake added to cart", body = ApiResponse<Cart>),
        (status = 400, description = "Cake not available"),
        (status = 404, description = "Cake not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Carts"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    customer: AuthCustomer,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let resp = cart_service::add_to_cart(&state, &customer, payload).await?;
    Ok(Json(resp))
}
