use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Cake;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCakeRequest {
    pub name: String,
    pub description: String,
    pub price: i64,
    pub available: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCakeRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub available: Option<bool>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CakeList {
    #[schema(value_type = Vec<Cake>)]
    pub items: Vec<Cake>,
}
