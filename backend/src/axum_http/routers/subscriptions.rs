use crate::usecases::subscriptions::SubscriptionUseCase;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use membership_core::domain::{
    repositories::{
        products::ProductRepository, subscriptions::SubscriptionRepository,
        users::UserRepository, vouchers::VoucherStore,
    },
    value_objects::subscriptions::{SubscribeRequest, UpdateSubscriptionRequest},
};
use std::sync::Arc;
use uuid::Uuid;

type SubscriptionUseCaseState<U, P, S, V> = State<Arc<SubscriptionUseCase<U, P, S, V>>>;

pub fn routes<U, P, S, V>(usecase: Arc<SubscriptionUseCase<U, P, S, V>>) -> Router
where
    U: UserRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    V: VoucherStore + Send + Sync + 'static,
{
    Router::new()
        .route("/subscriptions", post(subscribe))
        .route("/users/:user_id/subscriptions", get(list_subscriptions))
        .route(
            "/users/:user_id/subscriptions/:subscription_id",
            get(fetch_subscription).patch(update_subscription),
        )
        .with_state(usecase)
}

pub async fn subscribe<U, P, S, V>(
    State(usecase): SubscriptionUseCaseState<U, P, S, V>,
    Json(request): Json<SubscribeRequest>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    V: VoucherStore + Send + Sync + 'static,
{
    match usecase
        .subscribe(
            request.user_id,
            request.product_id,
            request.plan_id,
            request.voucher_id,
        )
        .await
    {
        Ok(subscription) => (StatusCode::CREATED, Json(subscription)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list_subscriptions<U, P, S, V>(
    State(usecase): SubscriptionUseCaseState<U, P, S, V>,
    Path(user_id): Path<Uuid>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    V: VoucherStore + Send + Sync + 'static,
{
    match usecase.list(user_id).await {
        Ok(subscriptions) => (StatusCode::OK, Json(subscriptions)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn fetch_subscription<U, P, S, V>(
    State(usecase): SubscriptionUseCaseState<U, P, S, V>,
    Path((user_id, subscription_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    V: VoucherStore + Send + Sync + 'static,
{
    match usecase.fetch(user_id, subscription_id).await {
        Ok(subscription) => (StatusCode::OK, Json(subscription)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update_subscription<U, P, S, V>(
    State(usecase): SubscriptionUseCaseState<U, P, S, V>,
    Path((user_id, subscription_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateSubscriptionRequest>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    V: VoucherStore + Send + Sync + 'static,
{
    match usecase
        .apply_action(user_id, subscription_id, request.action)
        .await
    {
        Ok(subscription) => (StatusCode::OK, Json(subscription)).into_response(),
        Err(err) => err.into_response(),
    }
}
