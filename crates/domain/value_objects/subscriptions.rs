use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::subscriptions::{SubscriptionEntity, SubscriptionPlan},
    value_objects::enums::{
        subscription_actions::SubscriptionAction, subscription_states::SubscriptionState,
    },
};

/// Gap between the end of the trial and the start of the paid term.
pub const START_OFFSET_HOURS: i64 = 1;

/// Trial, start and end dates of a fresh subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionSchedule {
    pub trial_date: DateTime<Utc>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl SubscriptionSchedule {
    /// Month arithmetic clamps to the last day of a shorter month (Jan 31 + 1 month = Feb 28/29).
    /// Returns `None` when the dates leave chrono's representable range.
    pub fn compute(
        now: DateTime<Utc>,
        trial_period_months: u32,
        plan_length_months: i32,
    ) -> Option<Self> {
        let trial_date = now.checked_add_months(Months::new(trial_period_months))?;
        let start_date = trial_date.checked_add_signed(Duration::hours(START_OFFSET_HOURS))?;
        let end_date = add_plan_length(start_date, plan_length_months)?;

        Some(Self {
            trial_date,
            start_date,
            end_date,
        })
    }
}

/// Unused term left when a subscription was paused: `(start + length) - pause_date`.
///
/// A pause that happened after the planned end yields zero.
pub fn remaining_term(
    start_date: DateTime<Utc>,
    plan_length_months: i32,
    pause_date: DateTime<Utc>,
) -> Option<Duration> {
    let planned_end = add_plan_length(start_date, plan_length_months)?;
    Some((planned_end - pause_date).max(Duration::zero()))
}

fn add_plan_length(from: DateTime<Utc>, plan_length_months: i32) -> Option<DateTime<Utc>> {
    let months = u32::try_from(plan_length_months).ok()?;
    from.checked_add_months(Months::new(months))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionDto {
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
    pub state: SubscriptionState,
}

impl From<SubscriptionEntity> for SubscriptionDto {
    fn from(value: SubscriptionEntity) -> Self {
        let state = value.state();
        Self {
            id: value.id,
            user_id: value.user_id,
            product_id: value.product_id,
            plan: value.plan,
            trial_date: value.trial_date,
            start_date: value.start_date,
            end_date: value.end_date,
            pause_date: value.pause_date,
            is_paused: value.is_paused,
            is_active: value.is_active,
            state,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscribeRequest {
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub plan_id: Uuid,
    #[serde(default)]
    pub voucher_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSubscriptionRequest {
    pub action: SubscriptionAction,
}
