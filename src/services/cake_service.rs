use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::dto::cakes::{CakeList, CreateCakeRequest, UpdateCakeRequest};
use crate::{
    audit::log_audit,
    entity::cakes::{ActiveModel, Column, Entity as Cakes, Model as CakeModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthCustomer, ensure_admin},
    models::Cake,
    response::{ApiResponse, Meta},
    routes::params::{CakeQuery, CakeSortBy, SortOrder},
    state::AppState,
};

pub async fn list_cakes(state: &AppState, query: CakeQuery) -> AppResult<ApiResponse<CakeList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all();

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        );
    }

    if let Some(min_price) = query.min_price {
        condition = condition.add(Column::Price.gte(min_price));
    }

    if let Some(max_price) = query.max_price {
        condition = condition.add(Column::Price.lte(max_price));
    }

    if let Some(available) = query.available {
        condition = condition.add(Column::Available.eq(available));
    }

    let sort_by = query.sort_by.unwrap_or(CakeSortBy::CreatedAt);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let sort_col = match sort_by {
        CakeSortBy::CreatedAt => Column::CreatedAt,
        CakeSortBy::Price => Column::Price,
        CakeSortBy::Name => Column::Name,
    };

    let mut finder = Cakes::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(cake_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    let data = CakeList { items };
    Ok(ApiResponse::success("Cakes", data, Some(meta)))
}

pub async fn get_cake(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Cake>> {
    let result = Cakes::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(cake_from_entity);
    let result = match result {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Cake", result, None))
}

pub async fn create_cake(
    state: &AppState,
    customer: &AuthCustomer,
    payload: CreateCakeRequest,
) -> AppResult<ApiResponse<Cake>> {
    ensure_admin(customer)?;
    let id = Uuid::new_v4();
    let active = ActiveModel {
        id: Set(id),
        name: Set(payload.name),
        description: Set(Some(payload.description)),
        price: Set(payload.price),
        available: Set(payload.available.unwrap_or(true)),
        created_at: NotSet,
    };
    let cake = active.insert(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(customer.customer_id),
        "cake_create",
        Some("cakes"),
        Some(serde_json::json!({ "cake_id": cake.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Cake created",
        cake_from_entity(cake),
        Some(Meta::empty()),
    ))
}

pub async fn update_cake(
    state: &AppState,
    customer: &AuthCustomer,
    id: Uuid,
    payload: UpdateCakeRequest,
) -> AppResult<ApiResponse<Cake>> {
    ensure_admin(customer)?;
    let existing = Cakes::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(available) = payload.available {
        active.available = Set(available);
    }

    let cake = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(customer.customer_id),
        "cake_update",
        Some("cakes"),
        Some(serde_json::json!({ "cake_id": cake.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Updated",
        cake_from_entity(cake),
        Some(Meta::empty()),
    ))
}

pub async fn delete_cake(
    state: &AppState,
    customer: &AuthCustomer,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(customer)?;
    let result = Cakes::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(customer.customer_id),
        "cake_delete",
        Some("cakes"),
        Some(serde_json::json!({ "cake_id": id })),
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

pub fn cake_from_entity(model: CakeModel) -> Cake {
    Cake {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        available: model.available,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
