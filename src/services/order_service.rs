use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::dto::orders::{OrderList, OrderWithItems, UpdateOrderRequest};
use crate::{
    audit::log_audit,
    entity::{
        cakes::Entity as Cakes,
        cart_cakes::{Column as CartCakeCol, Entity as CartCakes},
        carts::{Column as CartCol, Entity as Carts},
        customers::Entity as Customers,
        customizations::Entity as Customizations,
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::AuthCustomer,
    models::{Order, OrderItem},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

pub async fn list_orders(
    state: &AppState,
    customer: &AuthCustomer,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all().add(OrderCol::CustomerId.eq(customer.customer_id));
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::OrderStatus.eq(status.clone()));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut finder = Orders::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn place_order(
    state: &AppState,
    customer: &AuthCustomer,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let txn = state.orm.begin().await?;

    // Only a wholly absent cart is rejected; a present-but-empty cart
    // still materializes (as an empty order).
    let cart = Carts::find()
        .filter(CartCol::CustomerId.eq(customer.customer_id))
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let cart = match cart {
        Some(c) => c,
        None => return Err(AppError::BadRequest("Cart is empty".into())),
    };

    let buyer = Customers::find_by_id(customer.customer_id)
        .one(&txn)
        .await?;
    let buyer = match buyer {
        Some(b) => b,
        None => return Err(AppError::NotFound),
    };

    // The attached customization is copied into the order, not referenced.
    let customization_snapshot = match cart.customization_id {
        Some(id) => Customizations::find_by_id(id).one(&txn).await?.map(|c| {
            serde_json::json!({
                "message": c.message,
                "egg_version": c.egg_version,
                "toppings": c.toppings,
                "shape": c.shape,
            })
        }),
        None => None,
    };

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        customer_id: Set(customer.customer_id),
        total_price: Set(cart.total_amount),
        delivery_address: Set(buyer.address),
        order_status: Set("pending".into()),
        payment_status: Set("unpaid".into()),
        payment_method: Set(String::new()),
        customization: Set(customization_snapshot),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    // One line per distinct cake, unit price snapshotted at order time.
    let lines = CartCakes::find()
        .filter(CartCakeCol::CartId.eq(cart.id))
        .all(&txn)
        .await?;

    let mut seen: Vec<Uuid> = Vec::new();
    let mut items: Vec<OrderItem> = Vec::new();
    for line in &lines {
        if seen.contains(&line.cake_id) {
            continue;
        }
        seen.push(line.cake_id);

        let cake = Cakes::find_by_id(line.cake_id).one(&txn).await?;
        let cake = match cake {
            Some(c) => c,
            None => return Err(AppError::NotFound),
        };

        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            cake_id: Set(cake.id),
            price: Set(cake.price),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;

        items.push(order_item_from_entity(item));
    }

    // Consume the cart. Runs in the same transaction as the order insert,
    // so a failure on either side leaves both untouched.
    CartCakes::delete_many()
        .filter(CartCakeCol::CartId.eq(cart.id))
        .exec(&txn)
        .await?;
    Carts::delete_by_id(cart.id).exec(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(customer.customer_id),
        "order_place",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order placed",
        OrderWithItems {
            order: order_from_entity(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn update_order(
    state: &AppState,
    customer: &AuthCustomer,
    id: Uuid,
    payload: UpdateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    let txn = state.orm.begin().await?;

    let order = Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let recipient = Customers::find_by_id(order.customer_id).one(&txn).await?;
    let recipient = match recipient {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    let mut active: OrderActive = order.into();
    if let Some(order_status) = payload.order_status {
        active.order_status = Set(order_status);
    }
    if let Some(payment_status) = payload.payment_status {
        active.payment_status = Set(payment_status);
    }
    if let Some(payment_method) = payload.payment_method {
        active.payment_method = Set(payment_method);
    }
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;

    // The subject is fixed whatever status was submitted. Sent before the
    // commit: a delivery failure or timeout rolls the whole update back.
    state
        .notifier
        .send(
            &recipient.email,
            "Payment Successful",
            "Your order has been placed successfully!",
        )
        .await?;

    // Cascade-clear any cart that re-accumulated for this customer.
    // Absent is fine; the usual case after place_order.
    if let Some(cart) = Carts::find()
        .filter(CartCol::CustomerId.eq(order.customer_id))
        .lock(LockType::Update)
        .one(&txn)
        .await?
    {
        CartCakes::delete_many()
            .filter(CartCakeCol::CartId.eq(cart.id))
            .exec(&txn)
            .await?;
        Carts::delete_by_id(cart.id).exec(&txn).await?;
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(customer.customer_id),
        "order_update",
        Some("orders"),
        Some(serde_json::json!({
            "order_id": order.id,
            "order_status": order.order_status,
            "payment_status": order.payment_status,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order updated and email sent",
        order_from_entity(order),
        Some(Meta::empty()),
    ))
}

pub async fn get_order(
    state: &AppState,
    customer: &AuthCustomer,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::CustomerId.eq(customer.customer_id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order: order_from_entity(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        customer_id: model.customer_id,
        total_price: model.total_price,
        delivery_address: model.delivery_address,
        order_status: model.order_status,
        payment_status: model.payment_status,
        payment_method: model.payment_method,
        customization: model.customization,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        cake_id: model.cake_id,
        price: model.price,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
