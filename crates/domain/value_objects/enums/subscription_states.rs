use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Lifecycle position of a subscription. `Inactive` is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionState {
    Active,
    Paused,
    Inactive,
}

impl SubscriptionState {
    pub fn from_flags(is_active: bool, is_paused: bool) -> Self {
        match (is_active, is_paused) {
            (false, _) => SubscriptionState::Inactive,
            (true, true) => SubscriptionState::Paused,
            (true, false) => SubscriptionState::Active,
        }
    }
}

impl Display for SubscriptionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self {
            SubscriptionState::Active => "active",
            SubscriptionState::Paused => "paused",
            SubscriptionState::Inactive => "inactive",
        };
        write!(f, "{}", state)
    }
}
