use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::users::{InsertUserEntity, UserEntity},
    value_objects::subscriptions::SubscriptionDto,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subscriptions: Vec<SubscriptionDto>,
    pub created_at: DateTime<Utc>,
}

impl UserDto {
    pub fn new(entity: UserEntity, subscriptions: Vec<SubscriptionDto>) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            subscriptions,
            created_at: entity.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

impl CreateUserRequest {
    pub fn to_entity(&self) -> InsertUserEntity {
        InsertUserEntity {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
        }
    }
}
