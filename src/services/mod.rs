pub mod auth_service;
pub mod cake_service;
pub mod cart_service;
pub mod customization_service;
pub mod order_service;
