// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Lunary API Server
//!
//! Backend for the Lunary astrology app: product API, entitlements,
//! daily analytics, and Grimoire-backed social copy generation.

use lunary_api::{
    config::Config,
    db::PgDb,
    grimoire::GrimoireService,
    services::{DailyQuota, GenerationClient, MetricsService},
    social::CopyGenerator,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Lunary API");

    // Connect to Postgres and apply migrations
    let db = PgDb::connect(&config.database_url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");
    tracing::info!("Database ready");

    // Load the Grimoire catalog
    let grimoire_path = "data/grimoire.json";
    let grimoire =
        GrimoireService::load_from_file(grimoire_path).expect("Failed to load grimoire catalog");
    tracing::info!(
        path = grimoire_path,
        count = grimoire.snippets().len(),
        "Grimoire catalog loaded"
    );

    // Generation pipeline
    let generation_client = GenerationClient::new(
        config.generation_api_url.clone(),
        config.generation_api_key.clone(),
    );
    let generator = CopyGenerator::new(generation_client);

    // Metrics service and shared daily quota counters
    let metrics = MetricsService::new(db.clone());
    let quota = DailyQuota::new();

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        grimoire,
        generator,
        metrics,
        quota,
    });

    // Build router
    let app = lunary_api::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lunary_api=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
