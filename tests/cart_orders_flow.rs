use std::sync::Arc;

use axum_cakeshop_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        cart::{AddToCartRequest, CustomizationInput},
        orders::UpdateOrderRequest,
    },
    entity::{
        cakes::ActiveModel as CakeActive,
        cart_cakes::{Column as CartCakeCol, Entity as CartCakes},
        carts::{Column as CartCol, Entity as Carts},
        customers::ActiveModel as CustomerActive,
        customizations::{Column as CustomizationCol, Entity as Customizations},
        orders::{Column as OrderCol, Entity as Orders},
    },
    error::AppError,
    middleware::auth::AuthCustomer,
    notifier::MemoryNotifier,
    services::{cart_service, order_service},
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use uuid::Uuid;

// Integration flows for the cart-to-order transaction and the order state
// machine. Each test seeds its own customer so tests stay independent.
// Allow skipping when no DB is configured in the environment.
async fn setup() -> anyhow::Result<Option<(AppState, MemoryNotifier)>> {
    let database_url =
        match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            Ok(url) => url,
            Err(_) => {
                eprintln!(
                    "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
                );
                return Ok(None);
            }
        };

    let pool = create_pool(&database_url).await?;
    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;

    let notifier = MemoryNotifier::new();
    let state = AppState {
        pool,
        orm,
        notifier: Arc::new(notifier.clone()),
    };
    Ok(Some((state, notifier)))
}

async fn create_customer(state: &AppState, address: &str) -> anyhow::Result<AuthCustomer> {
    let customer = CustomerActive {
        id: Set(Uuid::new_v4()),
        email: Set(format!("{}@example.com", Uuid::new_v4())),
        password_hash: Set("dummy".into()),
        address: Set(address.to_string()),
        role: Set("customer".into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthCustomer {
        customer_id: customer.id,
        role: "customer".into(),
    })
}

async fn create_cake(
    state: &AppState,
    name: &str,
    price: i64,
    available: bool,
) -> anyhow::Result<Uuid> {
    let cake = CakeActive {
        id: Set(Uuid::new_v4()),
        name: Set(format!("{name} {}", Uuid::new_v4())),
        description: Set(Some("A cake for testing".into())),
        price: Set(price),
        available: Set(available),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(cake.id)
}

fn add_request(cake_id: Uuid) -> AddToCartRequest {
    AddToCartRequest {
        cake_id,
        customization: None,
    }
}

#[tokio::test]
async fn first_add_creates_one_cart_with_quantity_one() -> anyhow::Result<()> {
    let Some((state, _notifier)) = setup().await? else {
        return Ok(());
    };
    let customer = create_customer(&state, "12 Oven Street").await?;
    let cake_id = create_cake(&state, "Black Forest", 45000, true).await?;

    let resp = cart_service::add_to_cart(&state, &customer, add_request(cake_id)).await?;
    let cart = resp.data.expect("cart data");
    assert_eq!(cart.quantity, 1);
    assert_eq!(cart.total_amount, 45000);

    let cart_count = Carts::find()
        .filter(CartCol::CustomerId.eq(customer.customer_id))
        .count(&state.orm)
        .await?;
    assert_eq!(cart_count, 1);

    let line_count = CartCakes::find()
        .filter(CartCakeCol::CartId.eq(cart.id))
        .count(&state.orm)
        .await?;
    assert_eq!(line_count, 1);

    Ok(())
}

#[tokio::test]
async fn repeated_adds_accumulate_quantity_and_lines() -> anyhow::Result<()> {
    let Some((state, _notifier)) = setup().await? else {
        return Ok(());
    };
    let customer = create_customer(&state, "12 Oven Street").await?;
    let chocolate = create_cake(&state, "Chocolate", 30000, true).await?;
    let vanilla = create_cake(&state, "Vanilla", 25000, true).await?;

    cart_service::add_to_cart(&state, &customer, add_request(chocolate)).await?;
    cart_service::add_to_cart(&state, &customer, add_request(chocolate)).await?;
    let resp = cart_service::add_to_cart(&state, &customer, add_request(vanilla)).await?;

    let cart = resp.data.expect("cart data");
    assert_eq!(cart.quantity, 3);
    assert_eq!(cart.total_amount, 30000 + 30000 + 25000);

    // duplicates count as separate units
    let line_count = CartCakes::find()
        .filter(CartCakeCol::CartId.eq(cart.id))
        .count(&state.orm)
        .await?;
    assert_eq!(line_count, 3);

    Ok(())
}

#[tokio::test]
async fn unavailable_cake_mutates_nothing() -> anyhow::Result<()> {
    let Some((state, _notifier)) = setup().await? else {
        return Ok(());
    };
    let customer = create_customer(&state, "12 Oven Street").await?;
    let sold_out = create_cake(&state, "Seasonal Mango", 60000, false).await?;

    let result = cart_service::add_to_cart(&state, &customer, add_request(sold_out)).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let cart_count = Carts::find()
        .filter(CartCol::CustomerId.eq(customer.customer_id))
        .count(&state.orm)
        .await?;
    assert_eq!(cart_count, 0);

    // the failure is also inert against an existing cart
    let chocolate = create_cake(&state, "Chocolate", 30000, true).await?;
    cart_service::add_to_cart(&state, &customer, add_request(chocolate)).await?;
    let result = cart_service::add_to_cart(&state, &customer, add_request(sold_out)).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let cart = Carts::find()
        .filter(CartCol::CustomerId.eq(customer.customer_id))
        .one(&state.orm)
        .await?
        .expect("cart");
    assert_eq!(cart.quantity, 1);
    assert_eq!(cart.total_amount, 30000);

    Ok(())
}

#[tokio::test]
async fn missing_cake_is_a_lookup_miss() -> anyhow::Result<()> {
    let Some((state, _notifier)) = setup().await? else {
        return Ok(());
    };
    let customer = create_customer(&state, "12 Oven Street").await?;

    let result = cart_service::add_to_cart(&state, &customer, add_request(Uuid::new_v4())).await;
    assert!(matches!(result, Err(AppError::NotFound)));

    Ok(())
}

#[tokio::test]
async fn latest_customization_replaces_prior_but_record_survives() -> anyhow::Result<()> {
    let Some((state, _notifier)) = setup().await? else {
        return Ok(());
    };
    let customer = create_customer(&state, "12 Oven Street").await?;
    let cake_id = create_cake(&state, "Red Velvet", 52000, true).await?;

    let first = AddToCartRequest {
        cake_id,
        customization: Some(CustomizationInput {
            message: Some("Happy Birthday".into()),
            egg_version: None,
            toppings: None,
            shape: None,
        }),
    };
    let second = AddToCartRequest {
        cake_id,
        customization: Some(CustomizationInput {
            message: Some("Congratulations".into()),
            egg_version: Some(true),
            toppings: Some("almonds".into()),
            shape: Some("heart".into()),
        }),
    };

    cart_service::add_to_cart(&state, &customer, first).await?;
    let resp = cart_service::add_to_cart(&state, &customer, second).await?;
    let cart = resp.data.expect("cart data");

    let attached = Customizations::find_by_id(cart.customization_id.expect("attached"))
        .one(&state.orm)
        .await?
        .expect("customization");
    assert_eq!(attached.message, "Congratulations");
    assert!(attached.egg_version);

    // the replaced record still exists standalone
    let total = Customizations::find()
        .filter(CustomizationCol::CustomerId.eq(customer.customer_id))
        .count(&state.orm)
        .await?;
    assert_eq!(total, 2);

    Ok(())
}

#[tokio::test]
async fn place_order_snapshots_cart_and_consumes_it() -> anyhow::Result<()> {
    let Some((state, _notifier)) = setup().await? else {
        return Ok(());
    };
    let customer = create_customer(&state, "7 Frosting Avenue").await?;
    let chocolate = create_cake(&state, "Chocolate", 30000, true).await?;
    let vanilla = create_cake(&state, "Vanilla", 25000, true).await?;

    cart_service::add_to_cart(&state, &customer, add_request(chocolate)).await?;
    cart_service::add_to_cart(&state, &customer, add_request(chocolate)).await?;
    cart_service::add_to_cart(&state, &customer, add_request(vanilla)).await?;

    let resp = order_service::place_order(&state, &customer).await?;
    let placed = resp.data.expect("order data");

    assert_eq!(placed.order.total_price, 30000 + 30000 + 25000);
    assert_eq!(placed.order.delivery_address, "7 Frosting Avenue");
    assert_eq!(placed.order.order_status, "pending");
    assert_eq!(placed.order.payment_status, "unpaid");

    // distinct cakes only, despite two chocolate units
    assert_eq!(placed.items.len(), 2);

    let cart = Carts::find()
        .filter(CartCol::CustomerId.eq(customer.customer_id))
        .one(&state.orm)
        .await?;
    assert!(cart.is_none(), "cart must be consumed by place_order");

    Ok(())
}

#[tokio::test]
async fn place_order_without_cart_fails_and_creates_nothing() -> anyhow::Result<()> {
    let Some((state, _notifier)) = setup().await? else {
        return Ok(());
    };
    let customer = create_customer(&state, "7 Frosting Avenue").await?;

    let result = order_service::place_order(&state, &customer).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let order_count = Orders::find()
        .filter(OrderCol::CustomerId.eq(customer.customer_id))
        .count(&state.orm)
        .await?;
    assert_eq!(order_count, 0);

    Ok(())
}

#[tokio::test]
async fn update_order_missing_id_sends_no_notification() -> anyhow::Result<()> {
    let Some((state, notifier)) = setup().await? else {
        return Ok(());
    };
    let customer = create_customer(&state, "7 Frosting Avenue").await?;

    let result = order_service::update_order(
        &state,
        &customer,
        Uuid::new_v4(),
        UpdateOrderRequest {
            order_status: Some("shipped".into()),
            payment_status: None,
            payment_method: None,
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::NotFound)));
    assert!(notifier.sent().await.is_empty());

    Ok(())
}

#[tokio::test]
async fn update_order_always_sends_fixed_subject_once() -> anyhow::Result<()> {
    let Some((state, notifier)) = setup().await? else {
        return Ok(());
    };
    let customer = create_customer(&state, "7 Frosting Avenue").await?;
    let cake_id = create_cake(&state, "Black Forest", 45000, true).await?;

    cart_service::add_to_cart(&state, &customer, add_request(cake_id)).await?;
    let placed = order_service::place_order(&state, &customer)
        .await?
        .data
        .expect("order data");

    // Even an explicitly failed payment status produces the fixed
    // "Payment Successful" message; the coupling is intentional here.
    let resp = order_service::update_order(
        &state,
        &customer,
        placed.order.id,
        UpdateOrderRequest {
            order_status: None,
            payment_status: Some("failed".into()),
            payment_method: Some("card".into()),
        },
    )
    .await?;
    let updated = resp.data.expect("order data");
    assert_eq!(updated.payment_status, "failed");
    assert_eq!(updated.payment_method, "card");
    // unsupplied fields keep their values
    assert_eq!(updated.order_status, "pending");

    let sent = notifier.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Payment Successful");

    Ok(())
}

#[tokio::test]
async fn notifier_failure_rolls_back_the_update() -> anyhow::Result<()> {
    let Some((state, notifier)) = setup().await? else {
        return Ok(());
    };
    let customer = create_customer(&state, "7 Frosting Avenue").await?;
    let cake_id = create_cake(&state, "Black Forest", 45000, true).await?;

    cart_service::add_to_cart(&state, &customer, add_request(cake_id)).await?;
    let placed = order_service::place_order(&state, &customer)
        .await?
        .data
        .expect("order data");

    notifier.set_failing(true);
    let result = order_service::update_order(
        &state,
        &customer,
        placed.order.id,
        UpdateOrderRequest {
            order_status: Some("shipped".into()),
            payment_status: Some("paid".into()),
            payment_method: None,
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::Notification(_))));

    // the status write must not have survived the failed notification
    let order = Orders::find_by_id(placed.order.id)
        .one(&state.orm)
        .await?
        .expect("order");
    assert_eq!(order.order_status, "pending");
    assert_eq!(order.payment_status, "unpaid");

    Ok(())
}

#[tokio::test]
async fn concurrent_first_adds_share_one_cart() -> anyhow::Result<()> {
    let Some((state, _notifier)) = setup().await? else {
        return Ok(());
    };
    let customer = create_customer(&state, "12 Oven Street").await?;
    let cake_id = create_cake(&state, "Classic Vanilla", 30000, true).await?;

    let (first, second) = tokio::join!(
        cart_service::add_to_cart(&state, &customer, add_request(cake_id)),
        cart_service::add_to_cart(&state, &customer, add_request(cake_id)),
    );
    first?;
    second?;

    let cart_count = Carts::find()
        .filter(CartCol::CustomerId.eq(customer.customer_id))
        .count(&state.orm)
        .await?;
    assert_eq!(cart_count, 1);

    let cart = Carts::find()
        .filter(CartCol::CustomerId.eq(customer.customer_id))
        .one(&state.orm)
        .await?
        .expect("cart");
    assert_eq!(cart.quantity, 2);

    Ok(())
}

// The end-to-end scenario: customize, order, pay, and the cascade-clear
// stays quiet once the cart is already gone.
#[tokio::test]
async fn full_order_lifecycle() -> anyhow::Result<()> {
    let Some((state, notifier)) = setup().await? else {
        return Ok(());
    };
    let customer = create_customer(&state, "221B Baker Street").await?;
    let cake_id = create_cake(&state, "Black Forest", 45000, true).await?;

    cart_service::add_to_cart(
        &state,
        &customer,
        AddToCartRequest {
            cake_id,
            customization: Some(CustomizationInput {
                message: Some("Happy Birthday".into()),
                egg_version: None,
                toppings: None,
                shape: None,
            }),
        },
    )
    .await?;

    let placed = order_service::place_order(&state, &customer)
        .await?
        .data
        .expect("order data");
    assert_eq!(placed.order.total_price, 45000);
    assert_eq!(placed.items.len(), 1);
    assert_eq!(placed.items[0].cake_id, cake_id);

    let snapshot = placed.order.customization.as_ref().expect("snapshot");
    assert_eq!(snapshot["message"], "Happy Birthday");

    let cart = Carts::find()
        .filter(CartCol::CustomerId.eq(customer.customer_id))
        .one(&state.orm)
        .await?;
    assert!(cart.is_none());

    let updated = order_service::update_order(
        &state,
        &customer,
        placed.order.id,
        UpdateOrderRequest {
            order_status: Some("shipped".into()),
            payment_status: Some("paid".into()),
            payment_method: Some("card".into()),
        },
    )
    .await?
    .data
    .expect("order data");
    assert_eq!(updated.order_status, "shipped");
    assert_eq!(updated.payment_status, "paid");
    assert_eq!(notifier.sent().await.len(), 1);

    // a second update finds no cart to clear and still succeeds
    let again = order_service::update_order(
        &state,
        &customer,
        placed.order.id,
        UpdateOrderRequest {
            order_status: Some("delivered".into()),
            payment_status: None,
            payment_method: None,
        },
    )
    .await?
    .data
    .expect("order data");
    assert_eq!(again.order_status, "delivered");
    assert_eq!(again.payment_status, "paid");
    assert_eq!(notifier.sent().await.len(), 2);

    Ok(())
}
