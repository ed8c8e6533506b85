use std::sync::Arc;

use membership_core::domain::{
    repositories::products::ProductRepository,
    value_objects::{
        money::{Amount, Money},
        products::{CreateProductPlanRequest, CreateProductRequest, ProductDto},
    },
};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::errors::{UseCaseError, UseCaseResult};

pub struct ProductUseCase<P>
where
    P: ProductRepository + Send + Sync + 'static,
{
    product_repo: Arc<P>,
}

impl<P> ProductUseCase<P>
where
    P: ProductRepository + Send + Sync + 'static,
{
    pub fn new(product_repo: Arc<P>) -> Self {
        Self { product_repo }
    }

    pub async fn create(&self, request: CreateProductRequest) -> UseCaseResult<ProductDto> {
        info!(plan_count = request.plans.len(), "products: create requested");

        let insert_product_entity = request.to_entity();
        if insert_product_entity.name.is_empty() {
            let err = UseCaseError::InvalidArgument("name must not be empty".to_string());
            warn!(status = err.status_code().as_u16(), "products: create rejected");
            return Err(err);
        }
        for plan in &request.plans {
            validate_plan(plan).inspect_err(|err| {
                warn!(
                    status = err.status_code().as_u16(),
                    error = %err,
                    "products: plan rejected"
                );
            })?;
        }

        let product = self
            .product_repo
            .create(insert_product_entity)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "products: failed to create product");
                UseCaseError::Internal(err)
            })?;

        info!(product_id = %product.id, "products: product created");
        Ok(ProductDto::from(product))
    }

    pub async fn fetch(&self, product_id: Uuid) -> UseCaseResult<ProductDto> {
        info!(%product_id, "products: fetch requested");

        self.product_repo
            .find_by_id(product_id)
            .await
            .map_err(|err| {
                error!(%product_id, db_error = ?err, "products: failed to load product");
                UseCaseError::Internal(err)
            })?
            .map(ProductDto::from)
            .ok_or_else(|| {
                let err = UseCaseError::DataNotFound("product");
                warn!(%product_id, status = err.status_code().as_u16(), "products: product not found");
                err
            })
    }

    pub async fn list(&self) -> UseCaseResult<Vec<ProductDto>> {
        info!("products: listing products");

        let products = self.product_repo.list().await.map_err(|err| {
            error!(db_error = ?err, "products: failed to list products");
            UseCaseError::Internal(err)
        })?;

        let product_count = products.len();
        info!(product_count, "products: products loaded");
        Ok(products.into_iter().map(ProductDto::from).collect())
    }
}

fn validate_plan(plan: &CreateProductPlanRequest) -> UseCaseResult<()> {
    if plan.length_months < 1 {
        return Err(UseCaseError::InvalidArgument(
            "plan length must be at least one month".to_string(),
        ));
    }

    let price = non_negative(&plan.price, "price")?;
    let tax = non_negative(&plan.tax, "tax")?;
    if price.currency_code() != tax.currency_code() {
        return Err(UseCaseError::InvalidArgument(
            "price and tax must share a currency".to_string(),
        ));
    }

    Ok(())
}

fn non_negative(money: &Money, field: &str) -> UseCaseResult<Amount> {
    let amount = money.to_amount()?;
    if amount.is_negative() {
        return Err(UseCaseError::InvalidArgument(format!(
            "{field} must not be negative"
        )));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use membership_core::infra::memory::products::InMemoryProductRepository;

    fn plan(length_months: i32, price: Money, tax: Money) -> CreateProductPlanRequest {
        CreateProductPlanRequest {
            length_months,
            price,
            tax,
        }
    }

    fn use_case() -> ProductUseCase<InMemoryProductRepository> {
        ProductUseCase::new(Arc::new(InMemoryProductRepository::new()))
    }

    #[tokio::test]
    async fn created_product_can_be_fetched_and_listed() {
        let use_case = use_case();

        let product = use_case
            .create(CreateProductRequest {
                name: "Gym".to_string(),
                plans: vec![
                    plan(1, Money::new("EUR", "10.00"), Money::new("EUR", "1.90")),
                    plan(12, Money::new("EUR", "100.00"), Money::new("EUR", "19.00")),
                ],
            })
            .await
            .unwrap();

        assert_eq!(product.plans.len(), 2);
        assert_eq!(use_case.fetch(product.id).await.unwrap(), product);
        assert_eq!(use_case.list().await.unwrap(), vec![product]);
    }

    #[tokio::test]
    async fn invalid_plans_are_rejected() {
        let use_case = use_case();
        let bad_plans = [
            plan(0, Money::new("EUR", "10.00"), Money::new("EUR", "1.00")),
            plan(1, Money::new("EUR", "-1.00"), Money::new("EUR", "1.00")),
            plan(1, Money::new("EUR", "10.00.0"), Money::new("EUR", "1.00")),
            plan(1, Money::new("EUR", "10.00"), Money::new("USD", "1.00")),
            plan(1, Money::new("euro", "10.00"), Money::new("euro", "1.00")),
        ];

        for bad_plan in bad_plans {
            let err = use_case
                .create(CreateProductRequest {
                    name: "Gym".to_string(),
                    plans: vec![bad_plan],
                })
                .await
                .unwrap_err();
            assert!(matches!(err, UseCaseError::InvalidArgument(_)));
        }
        assert!(use_case.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_product_is_not_found() {
        let err = use_case().fetch(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, UseCaseError::DataNotFound("product")));
    }
}
