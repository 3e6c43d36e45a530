// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use lunary_api::config::Config;
use lunary_api::db::PgDb;
use lunary_api::grimoire::GrimoireService;
use lunary_api::routes::create_router;
use lunary_api::services::{DailyQuota, GenerationClient, MetricsService};
use lunary_api::social::CopyGenerator;
use lunary_api::AppState;
use std::sync::Arc;

/// Check if a test database is available via environment variable.
#[allow(dead_code)]
pub fn database_available() -> bool {
    std::env::var("TEST_DATABASE_URL").is_ok()
}

/// Skip test with message if no test database is configured.
#[macro_export]
macro_rules! require_database {
    () => {
        if !crate::common::database_available() {
            eprintln!("Skipping: TEST_DATABASE_URL not set");
            return;
        }
    };
}

/// Connect to the configured test database and apply migrations.
#[allow(dead_code)]
pub async fn test_db() -> PgDb {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL set");
    let db = PgDb::connect(&url)
        .await
        .expect("Failed to connect to test database");
    db.migrate().await.expect("Failed to run migrations");
    db
}

/// Create a database handle that never connects (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> PgDb {
    PgDb::connect_lazy("postgres://localhost:1/lunary_test_offline")
        .expect("lazy pool from static URL")
}

/// Create a test app with offline dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();

    // The checked-in catalog doubles as a parse test for the data file
    let grimoire =
        GrimoireService::load_from_file("data/grimoire.json").expect("grimoire catalog loads");

    let client = GenerationClient::new(
        config.generation_api_url.clone(),
        config.generation_api_key.clone(),
    );

    let state = Arc::new(AppState {
        generator: CopyGenerator::new(client),
        metrics: MetricsService::new(db.clone()),
        quota: DailyQuota::new(),
        grimoire,
        db,
        config,
    });

    (create_router(state.clone()), state)
}

/// Create a test JWT for a user.
#[allow(dead_code)]
pub fn make_jwt(user_id: &str, email: Option<&str>, signing_key: &[u8]) -> String {
    lunary_api::middleware::auth::create_jwt(user_id, email, signing_key)
        .expect("test JWT encodes")
}
