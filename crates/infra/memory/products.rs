use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{
    entities::products::{InsertProductEntity, ProductEntity, ProductPlanEntity},
    repositories::products::ProductRepository,
};

#[derive(Default)]
pub struct InMemoryProductRepository {
    products: RwLock<Vec<ProductEntity>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, insert_product_entity: InsertProductEntity) -> Result<ProductEntity> {
        let now = Utc::now();
        let product_id = Uuid::new_v4();
        let product = ProductEntity {
            id: product_id,
            name: insert_product_entity.name,
            plans: insert_product_entity
                .plans
                .into_iter()
                .map(|plan| ProductPlanEntity {
                    id: Uuid::new_v4(),
                    product_id,
                    length_months: plan.length_months,
                    price: plan.price,
                    tax: plan.tax,
                })
                .collect(),
            created_at: now,
            updated_at: now,
        };

        self.products.write().await.push(product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, product_id: Uuid) -> Result<Option<ProductEntity>> {
        Ok(self
            .products
            .read()
            .await
            .iter()
            .find(|product| product.id == product_id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<ProductEntity>> {
        Ok(self.products.read().await.clone())
    }
}
