use axum::Router;

use crate::state::AppState;

pub mod cakes;
pub mod carts;
pub mod customers;
pub mod customizations;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/customers", customers::router())
        .nest("/cakes", cakes::router())
        .nest("/customizations", customizations::router())
        .nest("/carts", carts::router())
        .nest("/orders", orders::router())
}
