use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, put},
};
use uuid::Uuid;

use crate::{
    dto::cakes::{CakeList, CreateCakeRequest, UpdateCakeRequest},
    error::AppResult,
    middleware::auth::AuthCustomer,
    models::Cake,
    response::ApiResponse,
    routes::params::CakeQuery,
    services::cake_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cakes).post(create_cake))
        .route("/{id}", get(get_cake))
        .route("/{id}", put(update_cake))
        .route("/{id}", delete(delete_cake))
}

#[utoipa::path(
    get,
    path = "/api/cakes",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search in name and description"),
        ("min_price" = Option<i64>, Query, description = "Minimum price"),
        ("max_price" = Option<i64>, Query, description = "Maximum price"),
        ("available" = Option<bool>, Query, description = "Filter by availability"),
        ("sort_by" = Option<String>, Query, description = "Sort by: created_at, price, name"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "List cakes", body = ApiResponse<CakeList>)
    ),
    tag = "Cakes"
)]
pub async fn list_cakes(
    State(state): State<AppState>,
    Query(query): Query<CakeQuery>,
) -> AppResult<Json<ApiResponse<CakeList>>> {
    let resp = cake_service::list_cakes(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/cakes/{id}",
    params(
        ("id" = Uuid, Path, description = "Cake ID")
    ),
    responses(
        (status = 200, description = "Get cake", body = ApiResponse<Cake>),
        (status = 404, description = "Cake not found"),
    ),
    tag = "Cakes"
)]
pub async fn get_cake(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Cake>>> {
    let resp = cake_service::get_cake(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cakes",
    request_body = CreateCakeRequest,
    responses(
        (status = 201, description = "Create cake", body = ApiResponse<Cake>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cakes"
)]
pub async fn create_cake(
    State(state): State<AppState>,
    customer: AuthCustomer,
    Json(payload): Json<CreateCakeRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Cake>>)> {
    let resp = cake_service::create_cake(&state, &customer, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/cakes/{id}",
    params(
        ("id" = Uuid, Path, description = "Cake ID")
    ),
    request_body = UpdateCakeRequest,
    responses(
        (status = 200, description = "Updated cake", body = ApiResponse<Cake>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Cake not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cakes"
)]
pub async fn update_cake(
    State(state): State<AppState>,
    customer: AuthCustomer,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCakeRequest>,
) -> AppResult<Json<ApiResponse<Cake>>> {
    let resp = cake_service::update_cake(&state, &customer, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cakes/{id}",
    params(
        ("id" = Uuid, Path, description = "Cake ID")
    ),
    responses(
        (status = 200, description = "Deleted cake"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Cake not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cakes"
)]
pub async fn delete_cake(
    State(state): State<AppState>,
    customer: AuthCustomer,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cake_service::delete_cake(&state, &customer, id).await?;
    Ok(Json(resp))
}
