use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{LockType, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::dto::cart::{AddToCartRequest, CartDetail};
use crate::services::cake_service::cake_from_entity;
use crate::services::customization_service::customization_from_entity;
use crate::{
    audit::log_audit,
    entity::{
        cakes::Entity as Cakes,
        cart_cakes::{ActiveModel as CartCakeActive, Column as CartCakeCol, Entity as CartCakes},
        carts::{ActiveModel as CartActive, Column as CartCol, Entity as Carts, Model as CartModel},
        customizations::{ActiveModel as CustomizationActive, Entity as Customizations},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthCustomer,
    models::Cart,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn get_cart(
    state: &AppState,
    customer: &AuthCustomer,
) -> AppResult<ApiResponse<CartDetail>> {
    let cart = Carts::find()
        .filter(CartCol::CustomerId.eq(customer.customer_id))
        .one(&state.orm)
        .await?;
    let cart = match cart {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    let cakes = CartCakes::find()
        .filter(CartCakeCol::CartId.eq(cart.id))
        .find_also_related(Cakes)
        .all(&state.orm)
        .await?
        .into_iter()
        .filter_map(|(_, cake)| cake.map(cake_from_entity))
        .collect();

    let customization = match cart.customization_id {
        Some(id) => Customizations::find_by_id(id)
            .one(&state.orm)
            .await?
            .map(customization_from_entity),
        None => None,
    };

    let data = CartDetail {
        cart: cart_from_entity(cart),
        cakes,
        customization,
    };
    Ok(ApiResponse::success("OK", data, Some(Meta::empty())))
}

pub async fn add_to_cart(
    state: &AppState,
    customer: &AuthCustomer,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<Cart>> {
    let txn = state.orm.begin().await?;

    let cake = Cakes::find_by_id(payload.cake_id).one(&txn).await?;
    let cake = match cake {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };
    if !cake.available {
        return Err(AppError::BadRequest("Cake not available".into()));
    }

    // Get-or-create, serialized per customer: the unique key on customer_id
    // turns a concurrent double-insert into a no-op conflict, and the
    // re-select takes a row lock for the rest of the transaction.
    Carts::insert(CartActive {
        id: Set(Uuid::new_v4()),
        customer_id: Set(customer.customer_id),
        customization_id: Set(None),
        quantity: Set(0),
        total_amount: Set(0),
        created_at: NotSet,
        updated_at: NotSet,
    })
    .on_conflict(
        OnConflict::column(CartCol::CustomerId)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(&txn)
    .await?;

    let cart = Carts::find()
        .filter(CartCol::CustomerId.eq(customer.customer_id))
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let cart = match cart {
        Some(c) => c,
        None => return Err(AppError::Conflict("Cart vanished mid-transaction".into())),
    };
    let cart_id = cart.id;

    let mut active: CartActive = cart.clone().into();

    if let Some(custom) = payload.customization {
        let customization = CustomizationActive {
            id: Set(Uuid::new_v4()),
            customer_id: Set(customer.customer_id),
            cake_id: Set(cake.id),
            message: Set(custom.message.unwrap_or_default()),
            egg_version: Set(custom.egg_version.unwrap_or(false)),
            toppings: Set(custom.toppings.unwrap_or_default()),
            shape: Set(custom.shape.unwrap_or_default()),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;

        // Only the latest customization stays attached; the previous
        // record survives standalone.
        active.customization_id = Set(Some(customization.id));
    }

    CartCakeActive {
        id: Set(Uuid::new_v4()),
        cart_id: Set(cart_id),
        cake_id: Set(cake.id),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    active.quantity = Set(cart.quantity + 1);
    active.total_amount = Set(cart.total_amount + cake.price);
    active.updated_at = Set(Utc::now().into());
    let cart = active.update(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(customer.customer_id),
        "cart_add",
        Some("carts"),
        Some(serde_json::json!({ "cart_id": cart.id, "cake_id": cake.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Cake added to cart",
        cart_from_entity(cart),
        Some(Meta::empty()),
    ))
}

pub fn cart_from_entity(model: CartModel) -> Cart {
    Cart {
        id: model.id,
        customer_id: model.customer_id,
        customization_id: model.customization_id,
        quantity: model.quantity,
        total_amount: model.total_amount,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
