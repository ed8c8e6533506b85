use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{
    entities::subscriptions::{
        InsertSubscriptionEntity, SubscriptionEntity, UpdateSubscriptionEntity,
    },
    repositories::subscriptions::SubscriptionRepository,
};

#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    subscriptions: RwLock<Vec<SubscriptionEntity>>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn create(&self, insert_subscription_entity: InsertSubscriptionEntity) -> Result<Uuid> {
        let now = Utc::now();
        let subscription = SubscriptionEntity {
            id: Uuid::new_v4(),
            user_id: insert_subscription_entity.user_id,
            product_id: insert_subscription_entity.product_id,
            plan: insert_subscription_entity.plan,
            trial_date: insert_subscription_entity.trial_date,
            start_date: insert_subscription_entity.start_date,
            end_date: insert_subscription_entity.end_date,
            pause_date: None,
            is_paused: insert_subscription_entity.is_paused,
            is_active: insert_subscription_entity.is_active,
            created_at: now,
            updated_at: now,
        };
        let id = subscription.id;

        self.subscriptions.write().await.push(subscription);
        Ok(id)
    }

    async fn find_by_id(&self, subscription_id: Uuid) -> Result<Option<SubscriptionEntity>> {
        Ok(self
            .subscriptions
            .read()
            .await
            .iter()
            .find(|subscription| subscription.id == subscription_id)
            .cloned())
    }

    async fn find_active_by_user_and_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<SubscriptionEntity>> {
        Ok(self
            .subscriptions
            .read()
            .await
            .iter()
            .rev()
            .find(|subscription| {
                subscription.user_id == user_id
                    && subscription.product_id == product_id
                    && subscription.is_active
            })
            .cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<SubscriptionEntity>> {
        Ok(self
            .subscriptions
            .read()
            .await
            .iter()
            .filter(|subscription| subscription.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_fields(
        &self,
        subscription_id: Uuid,
        update_subscription_entity: UpdateSubscriptionEntity,
    ) -> Result<Option<SubscriptionEntity>> {
        let mut subscriptions = self.subscriptions.write().await;

        let Some(subscription) = subscriptions
            .iter_mut()
            .find(|subscription| subscription.id == subscription_id)
        else {
            return Ok(None);
        };

        update_subscription_entity.apply_to(subscription);
        Ok(Some(subscription.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::subscriptions::SubscriptionPlan, value_objects::money::Money,
    };

    fn insert(user_id: Uuid, product_id: Uuid) -> InsertSubscriptionEntity {
        let now = Utc::now();
        InsertSubscriptionEntity {
            user_id,
            product_id,
            plan: SubscriptionPlan {
                length_months: 1,
                price: Money::new("EUR", "100.00"),
                tax: Money::new("EUR", "10.00"),
                voucher_id: None,
            },
            trial_date: now,
            start_date: now,
            end_date: Some(now),
            is_paused: false,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn active_lookup_ignores_inactive_rows() {
        let repository = InMemorySubscriptionRepository::new();
        let (user_id, product_id) = (Uuid::new_v4(), Uuid::new_v4());

        let id = repository.create(insert(user_id, product_id)).await.unwrap();
        repository
            .update_fields(id, UpdateSubscriptionEntity::deactivate(Utc::now()))
            .await
            .unwrap();

        assert_eq!(
            repository
                .find_active_by_user_and_product(user_id, product_id)
                .await
                .unwrap(),
            None
        );
        assert_eq!(repository.list_by_user(user_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_of_unknown_id_reports_no_row() {
        let repository = InMemorySubscriptionRepository::new();

        let updated = repository
            .update_fields(Uuid::new_v4(), UpdateSubscriptionEntity::pause(Utc::now()))
            .await
            .unwrap();

        assert_eq!(updated, None);
    }
}
