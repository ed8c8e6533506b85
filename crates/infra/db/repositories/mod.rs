pub mod products;
pub mod subscriptions;
pub mod users;
