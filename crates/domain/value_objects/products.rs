use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::products::{
        InsertProductEntity, InsertProductPlanEntity, ProductEntity, ProductPlanEntity,
    },
    value_objects::money::Money,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductPlanDto {
    pub id: Uuid,
    pub length_months: i32,
    pub price: Money,
    pub tax: Money,
}

impl From<ProductPlanEntity> for ProductPlanDto {
    fn from(value: ProductPlanEntity) -> Self {
        Self {
            id: value.id,
            length_months: value.length_months,
            price: value.price,
            tax: value.tax,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductDto {
    pub id: Uuid,
    pub name: String,
    pub plans: Vec<ProductPlanDto>,
    pub created_at: DateTime<Utc>,
}

impl From<ProductEntity> for ProductDto {
    fn from(value: ProductEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            plans: value.plans.into_iter().map(ProductPlanDto::from).collect(),
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductPlanRequest {
    pub length_months: i32,
    pub price: Money,
    pub tax: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub plans: Vec<CreateProductPlanRequest>,
}

impl CreateProductRequest {
    pub fn to_entity(&self) -> InsertProductEntity {
        InsertProductEntity {
            name: self.name.trim().to_string(),
            plans: self
                .plans
                .iter()
                .map(|plan| InsertProductPlanEntity {
                    length_months: plan.length_months,
                    price: plan.price.clone(),
                    tax: plan.tax.clone(),
                })
                .collect(),
        }
    }
}
