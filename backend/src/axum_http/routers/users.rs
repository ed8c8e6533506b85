use crate::usecases::users::UserUseCase;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use membership_core::domain::{
    repositories::{subscriptions::SubscriptionRepository, users::UserRepository},
    value_objects::users::CreateUserRequest,
};
use std::sync::Arc;
use uuid::Uuid;

pub fn routes<U, S>(usecase: Arc<UserUseCase<U, S>>) -> Router
where
    U: UserRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/users", post(create_user))
        .route("/users/:user_id", get(fetch_user))
        .with_state(usecase)
}

pub async fn create_user<U, S>(
    State(usecase): State<Arc<UserUseCase<U, S>>>,
    Json(request): Json<CreateUserRequest>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match usecase.create(request).await {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn fetch_user<U, S>(
    State(usecase): State<Arc<UserUseCase<U, S>>>,
    Path(user_id): Path<Uuid>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match usecase.fetch(user_id).await {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(err) => err.into_response(),
    }
}
