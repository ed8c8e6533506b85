pub mod enums;
pub mod money;
pub mod products;
pub mod subscriptions;
pub mod users;
pub mod vouchers;
