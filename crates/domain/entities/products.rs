use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    domain::value_objects::money::Money,
    infra::db::postgres::schema::{product_plans, products},
};

#[derive(Debug, Clone, PartialEq)]
pub struct ProductEntity {
    pub id: Uuid,
    pub name: String,
    pub plans: Vec<ProductPlanEntity>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductEntity {
    pub fn find_plan(&self, plan_id: Uuid) -> Option<&ProductPlanEntity> {
        self.plans.iter().find(|plan| plan.id == plan_id)
    }
}

/// A priced, timed offering attached to a product. Never mutated by subscribing.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPlanEntity {
    pub id: Uuid,
    pub product_id: Uuid,
    pub length_months: i32,
    pub price: Money,
    pub tax: Money,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertProductEntity {
    pub name: String,
    pub plans: Vec<InsertProductPlanEntity>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertProductPlanEntity {
    pub length_months: i32,
    pub price: Money,
    pub tax: Money,
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = products)]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = products)]
pub struct InsertProductRow {
    pub name: String,
}

/// Raw row used for Diesel queries. Money columns stay as JSON and are parsed into Money.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = product_plans)]
pub struct ProductPlanRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub length_months: i32,
    pub price: serde_json::Value,
    pub tax: serde_json::Value,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = product_plans)]
pub struct InsertProductPlanRow {
    pub product_id: Uuid,
    pub length_months: i32,
    pub price: serde_json::Value,
    pub tax: serde_json::Value,
}

impl TryFrom<ProductPlanRow> for ProductPlanEntity {
    type Error = anyhow::Error;

    fn try_from(value: ProductPlanRow) -> Result<Self> {
        Ok(Self {
            id: value.id,
            product_id: value.product_id,
            length_months: value.length_months,
            price: serde_json::from_value(value.price)
                .with_context(|| format!("product plan {} has a malformed price", value.id))?,
            tax: serde_json::from_value(value.tax)
                .with_context(|| format!("product plan {} has a malformed tax", value.id))?,
        })
    }
}

impl InsertProductPlanRow {
    pub fn from_entity(product_id: Uuid, plan: &InsertProductPlanEntity) -> Result<Self> {
        Ok(Self {
            product_id,
            length_months: plan.length_months,
            price: serde_json::to_value(&plan.price)?,
            tax: serde_json::to_value(&plan.tax)?,
        })
    }
}

impl ProductEntity {
    pub fn from_rows(row: ProductRow, plan_rows: Vec<ProductPlanRow>) -> Result<Self> {
        let plans = plan_rows
            .into_iter()
            .map(ProductPlanEntity::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            id: row.id,
            name: row.name,
            plans,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
