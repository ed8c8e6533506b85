pub mod discount;
pub mod errors;
pub mod products;
pub mod subscriptions;
pub mod users;
pub mod vouchers;
