pub mod auth;
pub mod cakes;
pub mod cart;
pub mod customizations;
pub mod orders;
