use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{
    entities::users::{InsertUserEntity, UserEntity},
    repositories::users::UserRepository,
};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, UserEntity>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, insert_user_entity: InsertUserEntity) -> Result<UserEntity> {
        let mut users = self.users.write().await;

        // Mirrors the unique index on users.email.
        if users
            .values()
            .any(|user| user.email == insert_user_entity.email)
        {
            bail!("users.email {} already exists", insert_user_entity.email);
        }

        let now = Utc::now();
        let user = UserEntity {
            id: Uuid::new_v4(),
            name: insert_user_entity.name,
            email: insert_user_entity.email,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserEntity>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }
}
