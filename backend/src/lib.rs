pub mod axum_http;
pub mod config;
pub mod usecases;

use std::sync::Arc;

use anyhow::Result;
use axum_http::http_serve::{self, Repositories};
use membership_core::infra::{
    db::{
        postgres::postgres_connection,
        repositories::{
            products::ProductPostgres, subscriptions::SubscriptionPostgres, users::UserPostgres,
        },
    },
    memory::{
        products::InMemoryProductRepository, subscriptions::InMemorySubscriptionRepository,
        users::InMemoryUserRepository, vouchers::InMemoryVoucherStore,
    },
};
use tracing::{info, warn};
use usecases::vouchers::{VoucherUseCase, load_seeds};

pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    membership_core::observability::init_observability("backend")?;

    let dotenvy_env = Arc::new(config::config_loader::load()?);
    info!("ENV has been loaded");

    // Seeded before the listener is bound; the store is read-only afterwards.
    let voucher_store = Arc::new(InMemoryVoucherStore::new());
    let seeds = load_seeds(dotenvy_env.membership.voucher_seed_path.as_deref())?;
    let vouchers = VoucherUseCase::new(Arc::clone(&voucher_store))
        .seed(seeds)
        .await?;
    info!(voucher_count = vouchers.len(), "Voucher store has been seeded");

    let app = match &dotenvy_env.database {
        Some(database) => {
            let postgres_pool = Arc::new(postgres_connection::establish_connection(
                &database.url,
                database.max_connections,
            )?);
            info!("Postgres connection has been established");

            http_serve::app(
                &dotenvy_env,
                Repositories {
                    users: Arc::new(UserPostgres::new(Arc::clone(&postgres_pool))),
                    products: Arc::new(ProductPostgres::new(Arc::clone(&postgres_pool))),
                    subscriptions: Arc::new(SubscriptionPostgres::new(Arc::clone(
                        &postgres_pool,
                    ))),
                    vouchers: voucher_store,
                },
            )?
        }
        None => {
            warn!("DATABASE_URL is not set; using in-memory repositories");
            http_serve::app(
                &dotenvy_env,
                Repositories {
                    users: Arc::new(InMemoryUserRepository::new()),
                    products: Arc::new(InMemoryProductRepository::new()),
                    subscriptions: Arc::new(InMemorySubscriptionRepository::new()),
                    vouchers: voucher_store,
                },
            )?
        }
    };

    http_serve::start(dotenvy_env, app).await
}
