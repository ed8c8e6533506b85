use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::subscriptions},
};
use domain::{
    entities::subscriptions::{
        InsertSubscriptionEntity, InsertSubscriptionRow, SubscriptionEntity, SubscriptionRow,
        UpdateSubscriptionEntity,
    },
    repositories::subscriptions::SubscriptionRepository,
};

pub struct SubscriptionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriptionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionPostgres {
    async fn create(&self, insert_subscription_entity: InsertSubscriptionEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = InsertSubscriptionRow::try_from(&insert_subscription_entity)?;
        let result = insert_into(subscriptions::table)
            .values(&row)
            .returning(subscriptions::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn find_by_id(&self, subscription_id: Uuid) -> Result<Option<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = subscriptions::table
            .filter(subscriptions::id.eq(subscription_id))
            .filter(subscriptions::deleted_at.is_null())
            .select(SubscriptionRow::as_select())
            .first::<SubscriptionRow>(&mut conn)
            .optional()?;

        row.map(SubscriptionEntity::try_from).transpose()
    }

    async fn find_active_by_user_and_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = subscriptions::table
            .filter(subscriptions::user_id.eq(user_id))
            .filter(subscriptions::product_id.eq(product_id))
            .filter(subscriptions::is_active.eq(true))
            .filter(subscriptions::deleted_at.is_null())
            .order(subscriptions::created_at.desc())
            .select(SubscriptionRow::as_select())
            .first::<SubscriptionRow>(&mut conn)
            .optional()?;

        row.map(SubscriptionEntity::try_from).transpose()
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = subscriptions::table
            .filter(subscriptions::user_id.eq(user_id))
            .filter(subscriptions::deleted_at.is_null())
            .order(subscriptions::created_at.asc())
            .select(SubscriptionRow::as_select())
            .load::<SubscriptionRow>(&mut conn)?;

        rows.into_iter().map(SubscriptionEntity::try_from).collect()
    }

    async fn update_fields(
        &self,
        subscription_id: Uuid,
        update_subscription_entity: UpdateSubscriptionEntity,
    ) -> Result<Option<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = update(
            subscriptions::table
                .filter(subscriptions::id.eq(subscription_id))
                .filter(subscriptions::deleted_at.is_null()),
        )
        .set(&update_subscription_entity)
        .returning(SubscriptionRow::as_returning())
        .get_result::<SubscriptionRow>(&mut conn)
        .optional()?;

        row.map(SubscriptionEntity::try_from).transpose()
    }
}
