// define modules in crate
mod backend;
mod config;
mod domain;
mod dtos;
mod error;
mod events;
mod middleware;
mod routes;
mod state;

use std::sync::Arc;

use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use axum_prometheus::PrometheusMetricLayer;
use dotenv::dotenv;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{event, Level};

use backend::HttpBackendService;
use config::AppConfig;
use events::RabbitMqMessageBroker;
use middleware::require_page_size;
use routes::*;
use state::AppState;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .json()
        .init();

    let config = AppConfig::from_env();

    let backend = Arc::new(HttpBackendService::new(&config));
    let broker = Arc::new(RabbitMqMessageBroker::new(&config).await.unwrap());

    let state = Arc::new(AppState { backend, broker });

    let (prometheus_layer, metrics_handle) = PrometheusMetricLayer::pair();

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.server_port))
        .await
        .unwrap();

    event!(Level::INFO, "listening on port {}", config.server_port);

    axum::serve(
        listener,
        Router::new()
            .route("/health", get(health))
            .route("/metrics", get(|| async move { metrics_handle.render() }))
            .route(
                "/findAvailableProducts",
                get(find_available_products::<HttpBackendService, RabbitMqMessageBroker>)
                    .route_layer(from_fn(require_page_size)),
            )
            .route(
                "/products",
                post(create_product::<HttpBackendService, RabbitMqMessageBroker>),
            )
            .route(
                "/orders",
                post(create_order::<HttpBackendService, RabbitMqMessageBroker>),
            )
            .with_state(state)
            .layer(prometheus_layer)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive()),
            ),
    )
    .await
    .unwrap();
}
