// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Lunary API: backend for the Lunary astrology/spirituality app.
//!
//! Serves the authenticated product API (friends, cosmic gifts,
//! entitlements), the admin analytics snapshot, the daily metrics cron,
//! and the Grimoire-backed social copy generation pipeline.

pub mod config;
pub mod db;
pub mod error;
pub mod grimoire;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod social;
pub mod time_utils;

use config::Config;
use db::PgDb;
use grimoire::GrimoireService;
use services::{DailyQuota, GenerationClient, MetricsService};
use social::CopyGenerator;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: PgDb,
    pub grimoire: GrimoireService,
    pub generator: CopyGenerator,
    pub metrics: MetricsService,
    pub quota: DailyQuota,
}

impl AppState {
    /// Offline state for router tests: lazy DB handle, empty grimoire,
    /// unroutable generation endpoint.
    pub fn for_tests(config: Config) -> Self {
        let db = PgDb::connect_lazy(&config.database_url)
            .expect("test database URL parses");
        let client = GenerationClient::new(
            config.generation_api_url.clone(),
            config.generation_api_key.clone(),
        );
        Self {
            db: db.clone(),
            grimoire: GrimoireService::default(),
            generator: CopyGenerator::new(client),
            metrics: MetricsService::new(db),
            quota: DailyQuota::new(),
            config,
        }
    }
}
