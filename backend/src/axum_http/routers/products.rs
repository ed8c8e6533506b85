use crate::usecases::products::ProductUseCase;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use membership_core::domain::{
    repositories::products::ProductRepository, value_objects::products::CreateProductRequest,
};
use std::sync::Arc;
use uuid::Uuid;

pub fn routes<P>(usecase: Arc<ProductUseCase<P>>) -> Router
where
    P: ProductRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/:product_id", get(fetch_product))
        .with_state(usecase)
}

pub async fn create_product<P>(
    State(usecase): State<Arc<ProductUseCase<P>>>,
    Json(request): Json<CreateProductRequest>,
) -> impl IntoResponse
where
    P: ProductRepository + Send + Sync + 'static,
{
    match usecase.create(request).await {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list_products<P>(State(usecase): State<Arc<ProductUseCase<P>>>) -> impl IntoResponse
where
    P: ProductRepository + Send + Sync + 'static,
{
    match usecase.list().await {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn fetch_product<P>(
    State(usecase): State<Arc<ProductUseCase<P>>>,
    Path(product_id): Path<Uuid>,
) -> impl IntoResponse
where
    P: ProductRepository + Send + Sync + 'static,
{
    match usecase.fetch(product_id).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(err) => err.into_response(),
    }
}
