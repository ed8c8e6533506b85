use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*};
use std::{collections::HashMap, sync::Arc};
use uuid::Uuid;

use crate::{
    domain::{
        entities::products::{
            InsertProductEntity, InsertProductPlanRow, InsertProductRow, ProductEntity,
            ProductPlanRow, ProductRow,
        },
        repositories::products::ProductRepository,
    },
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{product_plans, products},
    },
};

pub struct ProductPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ProductPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ProductRepository for ProductPostgres {
    async fn create(&self, insert_product_entity: InsertProductEntity) -> Result<ProductEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction::<_, anyhow::Error, _>(|conn| {
            let product_row = insert_into(products::table)
                .values(&InsertProductRow {
                    name: insert_product_entity.name.clone(),
                })
                .returning(ProductRow::as_returning())
                .get_result::<ProductRow>(conn)?;

            let plan_rows = insert_product_entity
                .plans
                .iter()
                .map(|plan| InsertProductPlanRow::from_entity(product_row.id, plan))
                .collect::<Result<Vec<_>>>()?;

            let inserted_plans = if plan_rows.is_empty() {
                Vec::new()
            } else {
                insert_into(product_plans::table)
                    .values(&plan_rows)
                    .returning(ProductPlanRow::as_returning())
                    .get_results::<ProductPlanRow>(conn)?
            };

            ProductEntity::from_rows(product_row, inserted_plans)
        })
    }

    async fn find_by_id(&self, product_id: Uuid) -> Result<Option<ProductEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let Some(product_row) = products::table
            .filter(products::id.eq(product_id))
            .filter(products::deleted_at.is_null())
            .select(ProductRow::as_select())
            .first::<ProductRow>(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        let plan_rows = product_plans::table
            .filter(product_plans::product_id.eq(product_id))
            .filter(product_plans::deleted_at.is_null())
            .order(product_plans::length_months.asc())
            .select(ProductPlanRow::as_select())
            .load::<ProductPlanRow>(&mut conn)?;

        ProductEntity::from_rows(product_row, plan_rows).map(Some)
    }

    async fn list(&self) -> Result<Vec<ProductEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let product_rows = products::table
            .filter(products::deleted_at.is_null())
            .order(products::created_at.asc())
            .select(ProductRow::as_select())
            .load::<ProductRow>(&mut conn)?;

        let product_ids: Vec<Uuid> = product_rows.iter().map(|row| row.id).collect();
        let plan_rows = product_plans::table
            .filter(product_plans::product_id.eq_any(&product_ids))
            .filter(product_plans::deleted_at.is_null())
            .order(product_plans::length_months.asc())
            .select(ProductPlanRow::as_select())
            .load::<ProductPlanRow>(&mut conn)?;

        let mut plans_by_product: HashMap<Uuid, Vec<ProductPlanRow>> = HashMap::new();
        for plan_row in plan_rows {
            plans_by_product
                .entry(plan_row.product_id)
                .or_default()
                .push(plan_row);
        }

        product_rows
            .into_iter()
            .map(|row| {
                let plans = plans_by_product.remove(&row.id).unwrap_or_default();
                ProductEntity::from_rows(row, plans)
            })
            .collect()
    }
}
