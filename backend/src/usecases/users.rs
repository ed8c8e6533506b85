use std::sync::Arc;

use membership_core::domain::{
    repositories::{subscriptions::SubscriptionRepository, users::UserRepository},
    value_objects::{
        subscriptions::SubscriptionDto,
        users::{CreateUserRequest, UserDto},
    },
};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::errors::{UseCaseError, UseCaseResult};

pub struct UserUseCase<U, S>
where
    U: UserRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    subscription_repo: Arc<S>,
}

impl<U, S> UserUseCase<U, S>
where
    U: UserRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    pub fn new(user_repo: Arc<U>, subscription_repo: Arc<S>) -> Self {
        Self {
            user_repo,
            subscription_repo,
        }
    }

    pub async fn create(&self, request: CreateUserRequest) -> UseCaseResult<UserDto> {
        let insert_user_entity = request.to_entity();
        info!(email = %insert_user_entity.email, "users: create requested");

        if insert_user_entity.name.is_empty() {
            return Err(reject("name must not be empty"));
        }
        if !insert_user_entity.email.contains('@') {
            return Err(reject("email is invalid"));
        }

        let existing = self
            .user_repo
            .find_by_email(&insert_user_entity.email)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "users: failed to look up email");
                UseCaseError::Internal(err)
            })?;
        if existing.is_some() {
            return Err(reject("email is already registered"));
        }

        let user = self
            .user_repo
            .create(insert_user_entity)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "users: failed to create user");
                UseCaseError::Internal(err)
            })?;

        info!(user_id = %user.id, "users: user created");
        Ok(UserDto::new(user, Vec::new()))
    }

    /// The user together with all of their subscriptions.
    pub async fn fetch(&self, user_id: Uuid) -> UseCaseResult<UserDto> {
        info!(%user_id, "users: fetch requested");

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "users: failed to load user");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| {
                let err = UseCaseError::DataNotFound("user");
                warn!(%user_id, status = err.status_code().as_u16(), "users: user not found");
                err
            })?;

        let subscriptions = self
            .subscription_repo
            .list_by_user(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "users: failed to load subscriptions");
                UseCaseError::Internal(err)
            })?;

        Ok(UserDto::new(
            user,
            subscriptions.into_iter().map(SubscriptionDto::from).collect(),
        ))
    }
}

fn reject(message: &str) -> UseCaseError {
    let err = UseCaseError::InvalidArgument(message.to_string());
    warn!(status = err.status_code().as_u16(), reason = message, "users: create rejected");
    err
}
