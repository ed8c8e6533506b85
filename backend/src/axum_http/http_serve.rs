use crate::{
    axum_http::{default_routers, routers},
    config::config_model::DotEnvyConfig,
    usecases::{
        products::ProductUseCase, subscriptions::SubscriptionUseCase, users::UserUseCase,
    },
};
use anyhow::Result;
use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use membership_core::domain::repositories::{
    products::ProductRepository, subscriptions::SubscriptionRepository, users::UserRepository,
    vouchers::VoucherStore,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Storage collaborators shared by every use case.
pub struct Repositories<U, P, S, V> {
    pub users: Arc<U>,
    pub products: Arc<P>,
    pub subscriptions: Arc<S>,
    pub vouchers: Arc<V>,
}

pub fn app<U, P, S, V>(
    config: &DotEnvyConfig,
    repositories: Repositories<U, P, S, V>,
) -> Result<Router>
where
    U: UserRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    V: VoucherStore + Send + Sync + 'static,
{
    let user_usecase = UserUseCase::new(
        Arc::clone(&repositories.users),
        Arc::clone(&repositories.subscriptions),
    );
    let product_usecase = ProductUseCase::new(Arc::clone(&repositories.products));
    let subscription_usecase = SubscriptionUseCase::new(
        repositories.users,
        repositories.products,
        repositories.subscriptions,
        repositories.vouchers,
        config.membership.trial_period_months,
    );

    let api = Router::new()
        .merge(routers::users::routes(Arc::new(user_usecase)))
        .merge(routers::products::routes(Arc::new(product_usecase)))
        .merge(routers::subscriptions::routes(Arc::new(subscription_usecase)))
        .route("/health-check", get(default_routers::health_check));

    let app = Router::new()
        .nest("/api/v1", api)
        .fallback(default_routers::not_found)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.backend_server.timeout,
        )))
        .layer(RequestBodyLimitLayer::new(
            (config.backend_server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PATCH])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

pub async fn start(config: Arc<DotEnvyConfig>, app: Router) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.backend_server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.backend_server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = ?err, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = ?err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
