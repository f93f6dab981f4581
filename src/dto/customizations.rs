use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Customization;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCustomizationRequest {
    pub cake_id: Uuid,
    pub message: Option<String>,
    pub egg_version: Option<bool>,
    pub toppings: Option<String>,
    pub shape: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCustomizationRequest {
    pub message: Option<String>,
    pub egg_version: Option<bool>,
    pub toppings: Option<String>,
    pub shape: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CustomizationList {
    #[schema(value_type = Vec<Customization>)]
    pub items: Vec<Customization>,
}
