use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::subscriptions::{
    InsertSubscriptionEntity, SubscriptionEntity, UpdateSubscriptionEntity,
};

#[async_trait]
#[automock]
pub trait SubscriptionRepository {
    /// Persists a new subscription and returns its generated id.
    async fn create(&self, insert_subscription_entity: InsertSubscriptionEntity) -> Result<Uuid>;

    async fn find_by_id(&self, subscription_id: Uuid) -> Result<Option<SubscriptionEntity>>;

    async fn find_active_by_user_and_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<SubscriptionEntity>>;

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<SubscriptionEntity>>;

    /// Writes only the fields set in `update_subscription_entity`. `None` when no row matched.
    async fn update_fields(
        &self,
        subscription_id: Uuid,
        update_subscription_entity: UpdateSubscriptionEntity,
    ) -> Result<Option<SubscriptionEntity>>;
}
