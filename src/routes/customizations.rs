use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, put},
};
use uuid::Uuid;

use crate::{
    dto::customizations::{
        CreateCustomizationRequest, CustomizationList, UpdateCustomizationRequest,
    },
    error::AppResult,
    middleware::auth::AuthCustomer,
    models::Customization,
    response::ApiResponse,
    routes::params::Pagination,
    services::customization_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customizations).post(create_customization))
        .route("/{id}", get(get_customization))
        .route("/{id}", put(update_customization))
        .route("/{id}", delete(delete_customization))
}

#[utoipa::path(
    get,
    path = "/api/customizations",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "List own customizations", body = ApiResponse<CustomizationList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Customizations"
)]
pub async fn list_customizations(
    State(state): State<AppState>,
    customer: AuthCustomer,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<CustomizationList>>> {
    let resp =
        customization_service::list_customizations(&state, &customer, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/customizations/{id}",
    params(
        ("id" = Uuid, Path, description = "Customization ID")
    ),
    responses(
        (status = 200, description = "Get customization", body = ApiResponse<Customization>),
        (status = 404, description = "Customization not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Customizations"
)]
pub async fn get_customization(
    State(state): State<AppState>,
    customer: AuthCustomer,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Customization>>> {
    let resp = customization_service::get_customization(&state, &customer, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/customizations",
    request_body = CreateCustomizationRequest,
    responses(
        (status = 201, description = "Create customization", body = ApiResponse<Customization>),
        (status = 404, description = "Cake not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Customizations"
)]
pub async fn create_customization(
    State(state): State<AppState>,
    customer: AuthCustomer,
    Json(payload): Json<CreateCustomizationRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Customization>>)> {
    let resp = customization_service::create_customization(&state, &customer, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/customizations/{id}",
    params(
        ("id" = Uuid, Path, description = "Customization ID")
    ),
    request_body = UpdateCustomizationRequest,
    responses(
        (status = 200, description = "Updated customization", body = ApiResponse<Customization>),
        (status = 404, description = "Customization not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Customizations"
)]
pub async fn update_customization(
    State(state): State<AppState>,
    customer: AuthCustomer,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCustomizationRequest>,
) -> AppResult<Json<ApiResponse<Customization>>> {
    let resp = customization_service::update_customization(&state, &customer, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/customizations/{id}",
    params(
        ("id" = Uuid, Path, description = "Customization ID")
    ),
    responses(
        (status = 200, description = "Deleted customization"),
        (status = 404, description = "Customization not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Customizations"
)]
pub async fn delete_customization(
    State(state): State<AppState>,
    customer: AuthCustomer,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = customization_service::delete_customization(&state, &customer, id).await?;
    Ok(Json(resp))
}
