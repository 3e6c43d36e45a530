// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Cron routes, called by the platform scheduler.
//!
//! Protected by the bearer-secret middleware in routes/mod.rs.

use crate::error::{AppError, Result};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Cron routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/cron/compute-metrics", get(compute_metrics))
}

#[derive(Deserialize)]
struct ComputeMetricsQuery {
    /// Target date (YYYY-MM-DD); defaults to yesterday. Passing a date
    /// supports backfill.
    date: Option<String>,
}

#[derive(Serialize)]
pub struct ComputeMetricsResponse {
    pub success: bool,
    pub date: String,
    pub dau: i64,
    pub wau: i64,
    pub mau: i64,
    pub new_signups: i64,
    pub activation_rate: f64,
    pub mrr: f64,
    pub new_conversions: i64,
    pub computation_duration_ms: i64,
}

/// Compute and upsert the daily metrics row.
///
/// Idempotent: re-running for the same date updates the existing row.
async fn compute_metrics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ComputeMetricsQuery>,
) -> Result<Json<ComputeMetricsResponse>> {
    let date = match params.date.as_deref() {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            AppError::BadRequest("Invalid 'date' parameter: must be YYYY-MM-DD".to_string())
        })?,
        None => (Utc::now() - Duration::days(1)).date_naive(),
    };

    tracing::info!(date = %date, "Computing daily metrics");

    let metrics = state.metrics.compute_for_date(date).await?;

    Ok(Json(ComputeMetricsResponse {
        success: true,
        date: date.to_string(),
        dau: metrics.dau,
        wau: metrics.wau,
        mau: metrics.mau,
        new_signups: metrics.new_signups,
        activation_rate: metrics.activation_rate,
        mrr: metrics.mrr,
        new_conversions: metrics.new_conversions,
        computation_duration_ms: metrics.computation_duration_ms,
    }))
}
