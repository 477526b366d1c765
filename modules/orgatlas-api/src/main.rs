use std::sync::Arc;

use anyhow::Result;
use axum::{routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use orgatlas_common::Config;
use orgatlas_store::{ActivityStore, BuildingStore, OrganizationStore};

mod auth;
mod rest;

pub struct AppState {
    pub activities: ActivityStore,
    pub buildings: BuildingStore,
    pub organizations: OrganizationStore,
    pub api_key: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("orgatlas=info".parse()?))
        .init();

    let config = Config::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;

    let state = Arc::new(AppState {
        activities: ActivityStore::new(pool.clone()),
        buildings: BuildingStore::new(pool.clone()),
        organizations: OrganizationStore::new(pool),
        api_key: config.api_key,
    });

    let app = Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        // Organizations
        .route(
            "/api/v1/organizations",
            get(rest::organizations::list).post(rest::organizations::create),
        )
        .route(
            "/api/v1/organizations/{id}",
            get(rest::organizations::detail)
                .put(rest::organizations::update)
                .delete(rest::organizations::remove),
        )
        // Buildings
        .route(
            "/api/v1/buildings",
            get(rest::buildings::list).post(rest::buildings::create),
        )
        .route(
            "/api/v1/buildings/{id}",
            get(rest::buildings::detail)
                .put(rest::buildings::update)
                .delete(rest::buildings::remove),
        )
        .route(
            "/api/v1/buildings/{id}/organizations",
            get(rest::buildings::organizations),
        )
        // Activities
        .route(
            "/api/v1/activities",
            get(rest::activities::list).post(rest::activities::create),
        )
        .route(
            "/api/v1/activities/{id}",
            get(rest::activities::detail)
                .put(rest::activities::update)
                .delete(rest::activities::remove),
        )
        .route(
            "/api/v1/activities/{id}/organizations",
            get(rest::activities::organizations_by_subtree),
        )
        .with_state(state)
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Logging layer: method + path + status + latency only
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        );

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("orgatlas API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
