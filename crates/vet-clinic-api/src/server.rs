//! API server setup

use std::net::SocketAddr;

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use vet_clinic_core::Database;

use crate::auth::JwtConfig;
use crate::config::ApiConfig;
use crate::routes::create_router;
use crate::state::AppState;

/// Open the database and assemble the router with its middleware.
pub fn create_server(config: ApiConfig) -> anyhow::Result<(Router, SocketAddr)> {
    let jwt = JwtConfig::try_new(config.jwt_secret.clone())?;
    let db = Database::open(&config.db_path)
        .with_context(|| format!("opening database at {}", config.db_path))?;
    tracing::info!(path = %config.db_path, "database ready");

    let state = AppState::new(db, jwt, config.environment.clone());

    let router = create_router(state)
        .layer(cors_layer(&config.cors_origins)?)
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("parsing listen address")?;

    Ok((router, addr))
}

/// Run the API server until it fails.
pub async fn run_server(config: ApiConfig) -> anyhow::Result<()> {
    let environment = config.environment.clone();
    let (router, addr) = create_server(config)?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!(%addr, %environment, "vet clinic API listening");

    axum::serve(listener, router).await?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).with_context(|| format!("invalid CORS origin {origin}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ])
        .allow_credentials(true))
}
