pub mod cakes;
pub mod cart_cakes;
pub mod carts;
pub mod customers;
pub mod customizations;
pub mod order_items;
pub mod orders;

pub use cakes::Entity as Cakes;
pub use cart_cakes::Entity as CartCakes;
pub use carts::Entity as Carts;
pub use customers::Entity as Customers;
pub use customizations::Entity as Customizations;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
