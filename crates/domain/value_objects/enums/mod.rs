pub mod subscription_actions;
pub mod subscription_states;
pub mod voucher_types;
