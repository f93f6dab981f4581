use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cakes::{CakeList, CreateCakeRequest, UpdateCakeRequest},
        cart::{AddToCartRequest, CartDetail, CustomizationInput},
        customizations::{
            CreateCustomizationRequest, CustomizationList, UpdateCustomizationRequest,
        },
        orders::{OrderList, OrderWithItems, UpdateOrderRequest},
    },
    models::{Cake, Cart, Customer, Customization, Order, OrderItem},
    response::{ApiResponse, Meta},
    routes::{cakes, carts, customers, customizations, health, orders, params},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        customers::register,
        customers::login,
        cakes::list_cakes,
        cakes::get_cake,
        cakes::create_cake,
        cakes::update_cake,
        cakes::delete_cake,
        customizations::list_customizations,
        customizations::get_customization,
        customizations::create_customization,
        customizations::update_customization,
        customizations::delete_customization,
        carts::get_cart,
        carts::add_to_cart,
        orders::list_orders,
        orders::place_order,
        orders::get_order,
        orders::update_order
    ),
    components(
        schemas(
            Customer,
            Cake,
            Customization,
            Cart,
            Order,
            OrderItem,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CreateCakeRequest,
            UpdateCakeRequest,
            CakeList,
            CreateCustomizationRequest,
            UpdateCustomizationRequest,
            CustomizationList,
            AddToCartRequest,
            CustomizationInput,
            CartDetail,
            UpdateOrderRequest,
            OrderList,
            OrderWithItems,
            params::Pagination,
            params::CakeQuery,
            params::OrderListQuery,
            Meta,
            ApiResponse<Customer>,
            ApiResponse<Cake>,
            ApiResponse<CakeList>,
            ApiResponse<CartDetail>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Customers", description = "Registration and login"),
        (name = "Cakes", description = "Cake catalog endpoints"),
        (name = "Customizations", description = "Cake customization endpoints"),
        (name = "Carts", description = "Cart endpoints"),
        (name = "Orders", description = "Order endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
