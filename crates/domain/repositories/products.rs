use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::products::{InsertProductEntity, ProductEntity};

#[async_trait]
#[automock]
pub trait ProductRepository {
    /// Inserts the product together with its plans.
    async fn create(&self, insert_product_entity: InsertProductEntity) -> Result<ProductEntity>;

    async fn find_by_id(&self, product_id: Uuid) -> Result<Option<ProductEntity>>;

    async fn list(&self) -> Result<Vec<ProductEntity>>;
}
