use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    domain::value_objects::{enums::subscription_states::SubscriptionState, money::Money},
    infra::db::postgres::schema::subscriptions,
};

/// Product plan cloned into a subscription with the voucher-adjusted price and tax baked in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    pub length_months: i32,
    pub price: Money,
    pub tax: Money,
    pub voucher_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub plan: SubscriptionPlan,
    pub trial_date: DateTime<Utc>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub pause_date: Option<DateTime<Utc>>,
    pub is_paused: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SubscriptionEntity {
    pub fn state(&self) -> SubscriptionState {
        SubscriptionState::from_flags(self.is_active, self.is_paused)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertSubscriptionEntity {
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub plan: SubscriptionPlan,
    pub trial_date: DateTime<Utc>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_paused: bool,
    pub is_active: bool,
}

/// Named field set for a partial update. `None` leaves a column untouched and
/// `Some(None)` clears a nullable column.
#[derive(Debug, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = subscriptions)]
pub struct UpdateSubscriptionEntity {
    pub end_date: Option<Option<DateTime<Utc>>>,
    pub pause_date: Option<Option<DateTime<Utc>>>,
    pub is_paused: Option<bool>,
    pub is_active: Option<bool>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl UpdateSubscriptionEntity {
    pub fn pause(paused_at: DateTime<Utc>) -> Self {
        Self {
            end_date: Some(None),
            pause_date: Some(Some(paused_at)),
            is_paused: Some(true),
            is_active: None,
            updated_at: Some(paused_at),
        }
    }

    pub fn resume(end_date: DateTime<Utc>, resumed_at: DateTime<Utc>) -> Self {
        Self {
            end_date: Some(Some(end_date)),
            pause_date: Some(None),
            is_paused: Some(false),
            is_active: None,
            updated_at: Some(resumed_at),
        }
    }

    pub fn deactivate(deactivated_at: DateTime<Utc>) -> Self {
        Self {
            end_date: None,
            pause_date: None,
            is_paused: None,
            is_active: Some(false),
            updated_at: Some(deactivated_at),
        }
    }

    /// Applies the field set in place, as the storage layer would.
    pub fn apply_to(&self, subscription: &mut SubscriptionEntity) {
        if let Some(end_date) = self.end_date {
            subscription.end_date = end_date;
        }
        if let Some(pause_date) = self.pause_date {
            subscription.pause_date = pause_date;
        }
        if let Some(is_paused) = self.is_paused {
            subscription.is_paused = is_paused;
        }
        if let Some(is_active) = self.is_active {
            subscription.is_active = is_active;
        }
        if let Some(updated_at) = self.updated_at {
            subscription.updated_at = updated_at;
        }
    }
}

/// Raw row used for Diesel queries. Money columns stay as JSON and are parsed into Money.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = subscriptions)]
pub struct SubscriptionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub plan_length_months: i32,
    pub plan_price: serde_json::Value,
    pub plan_tax: serde_json::Value,
    pub voucher_id: Option<String>,
    pub trial_date: DateTime<Utc>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub pause_date: Option<DateTime<Utc>>,
    pub is_paused: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = subscriptions)]
pub struct InsertSubscriptionRow {
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub plan_length_months: i32,
    pub plan_price: serde_json::Value,
    pub plan_tax: serde_json::Value,
    pub voucher_id: Option<String>,
    pub trial_date: DateTime<Utc>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_paused: bool,
    pub is_active: bool,
}

impl TryFrom<SubscriptionRow> for SubscriptionEntity {
    type Error = anyhow::Error;

    fn try_from(value: SubscriptionRow) -> Result<Self> {
        let price = serde_json::from_value(value.plan_price)
            .with_context(|| format!("subscription {} has a malformed price", value.id))?;
        let tax = serde_json::from_value(value.plan_tax)
            .with_context(|| format!("subscription {} has a malformed tax", value.id))?;

        Ok(Self {
            id: value.id,
            user_id: value.user_id,
            product_id: value.product_id,
            plan: SubscriptionPlan {
                length_months: value.plan_length_months,
                price,
                tax,
                voucher_id: value.voucher_id,
            },
            trial_date: value.trial_date,
            start_date: value.start_date,
            end_date: value.end_date,
            pause_date: value.pause_date,
            is_paused: value.is_paused,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

impl TryFrom<&InsertSubscriptionEntity> for InsertSubscriptionRow {
    type Error = anyhow::Error;

    fn try_from(value: &InsertSubscriptionEntity) -> Result<Self> {
        Ok(Self {
            user_id: value.user_id,
            product_id: value.product_id,
            plan_length_months: value.plan.length_months,
            plan_price: serde_json::to_value(&value.plan.price)?,
            plan_tax: serde_json::to_value(&value.plan.tax)?,
            voucher_id: value.plan.voucher_id.clone(),
            trial_date: value.trial_date,
            start_date: value.start_date,
            end_date: value.end_date,
            is_paused: value.is_paused,
            is_active: value.is_active,
        })
    }
}
