use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Cake, Cart, Customization};

/// Personalization fields accepted inline with an add-to-cart call.
/// Missing fields fall back to the entity defaults.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CustomizationInput {
    pub message: Option<String>,
    pub egg_version: Option<bool>,
    pub toppings: Option<String>,
    pub shape: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub cake_id: Uuid,
    pub customization: Option<CustomizationInput>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartDetail {
    pub cart: Cart,
    pub cakes: Vec<Cake>,
    pub customization: Option<Customization>,
}
