use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::dto::customizations::{
    CreateCustomizationRequest, CustomizationList, UpdateCustomizationRequest,
};
use crate::{
    audit::log_audit,
    entity::{
        cakes::Entity as Cakes,
        customizations::{
            ActiveModel, Column, Entity as Customizations, Model as CustomizationModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::AuthCustomer,
    models::Customization,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub async fn list_customizations(
    state: &AppState,
    customer: &AuthCustomer,
    pagination: Pagination,
) -> AppResult<ApiResponse<CustomizationList>> {
    let (page, limit, offset) = pagination.normalize();

    let finder = Customizations::find()
        .filter(Column::CustomerId.eq(customer.customer_id))
        .order_by_desc(Column::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(customization_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    let data = CustomizationList { items };
    Ok(ApiResponse::success("Customizations", data, Some(meta)))
}

pub async fn get_customization(
    state: &AppState,
    customer: &AuthCustomer,
    id: Uuid,
) -> AppResult<ApiResponse<Customization>> {
    let result = Customizations::find()
        .filter(
            Condition::all()
                .add(Column::Id.eq(id))
                .add(Column::CustomerId.eq(customer.customer_id)),
        )
        .one(&state.orm)
        .await?
        .map(customization_from_entity);
    let result = match result {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Customization", result, None))
}

pub async fn create_customization(
    state: &AppState,
    customer: &AuthCustomer,
    payload: CreateCustomizationRequest,
) -> AppResult<ApiResponse<Customization>> {
    let cake = Cakes::find_by_id(payload.cake_id).one(&state.orm).await?;
    if cake.is_none() {
        return Err(AppError::NotFound);
    }

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        customer_id: Set(customer.customer_id),
        cake_id: Set(payload.cake_id),
        message: Set(payload.message.unwrap_or_default()),
        egg_version: Set(payload.egg_version.unwrap_or(false)),
        toppings: Set(payload.toppings.unwrap_or_default()),
        shape: Set(payload.shape.unwrap_or_default()),
        created_at: NotSet,
    };
    let customization = active.insert(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(customer.customer_id),
        "customization_create",
        Some("customizations"),
        Some(serde_json::json!({ "customization_id": customization.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Customization created",
        customization_from_entity(customization),
        Some(Meta::empty()),
    ))
}

pub async fn update_customization(
    state: &AppState,
    customer: &AuthCustomer,
    id: Uuid,
    payload: UpdateCustomizationRequest,
) -> AppResult<ApiResponse<Customization>> {
    let existing = Customizations::find()
        .filter(
            Condition::all()
                .add(Column::Id.eq(id))
                .add(Column::CustomerId.eq(customer.customer_id)),
        )
        .one(&state.orm)
        .await?;
    let existing = match existing {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    let mut active: ActiveModel = existing.into();
    if let Some(message) = payload.message {
        active.message = Set(message);
    }
    if let Some(egg_version) = payload.egg_version {
        active.egg_version = Set(egg_version);
    }
    if let Some(toppings) = payload.toppings {
        active.toppings = Set(toppings);
    }
    if let Some(shape) = payload.shape {
        active.shape = Set(shape);
    }

    let customization = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(customer.customer_id),
        "customization_update",
        Some("customizations"),
        Some(serde_json::json!({ "customization_id": customization.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Updated",
        customization_from_entity(customization),
        Some(Meta::empty()),
    ))
}

pub async fn delete_customization(
    state: &AppState,
    customer: &AuthCustomer,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Customizations::delete_many()
        .filter(
            Condition::all()
                .add(Column::Id.eq(id))
                .add(Column::CustomerId.eq(customer.customer_id)),
        )
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(customer.customer_id),
        "customization_delete",
        Some("customizations"),
        Some(serde_json::json!({ "customization_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub fn customization_from_entity(model: CustomizationModel) -> Customization {
    Customization {
        id: model.id,
        customer_id: model.customer_id,
        cake_id: model.cake_id,
        message: model.message,
        egg_version: model.egg_version,
        toppings: model.toppings,
        shape: model.shape,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
