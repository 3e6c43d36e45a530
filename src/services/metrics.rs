// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily metrics computation.
//!
//! Computes every aggregate once per day and caches the row in
//! `daily_metrics`, so historical dashboard queries never touch the
//! raw event table again.

use crate::db::PgDb;
use crate::error::AppError;
use crate::models::metrics::{AggregateCounts, DailyMetrics};
use crate::time_utils::{day_bounds, window_start};
use chrono::{Duration, NaiveDate, Utc};

/// Feature events tracked for adoption rates, in column order.
const ADOPTION_EVENTS: [&str; 6] = [
    "daily_dashboard_viewed",
    "personalized_horoscope_viewed",
    "tarot_drawn",
    "chart_viewed",
    "astral_chat_used",
    "ritual_started",
];

/// Metrics computation service.
#[derive(Clone)]
pub struct MetricsService {
    db: PgDb,
}

impl MetricsService {
    pub fn new(db: PgDb) -> Self {
        Self { db }
    }

    /// Compute all aggregates for one day and upsert the row.
    ///
    /// Idempotent per date: recomputing a day updates its existing row.
    pub async fn compute_for_date(&self, date: NaiveDate) -> Result<DailyMetrics, AppError> {
        let started = std::time::Instant::now();
        let (day_start, day_end) = day_bounds(date);
        let wau_start = window_start(date, 7);
        let mau_start = window_start(date, 30);

        // Active-user, growth and revenue aggregates, fired concurrently.
        let (
            dau,
            wau,
            mau,
            product_dau,
            product_wau,
            product_mau,
            app_opened_mau,
            new_signups,
            activated_users,
            mrr,
            subscription_counts,
            new_conversions,
        ) = tokio::try_join!(
            self.db.count_active_users(day_start, day_end),
            self.db.count_active_users(wau_start, day_end),
            self.db.count_active_users(mau_start, day_end),
            self.db.count_product_active_users(day_start, day_end),
            self.db.count_product_active_users(wau_start, day_end),
            self.db.count_product_active_users(mau_start, day_end),
            self.db.count_app_opened_users(mau_start, day_end),
            self.db.count_new_signups(day_start, day_end),
            self.db.count_activated_users(day_start, day_end),
            self.db.sum_mrr(),
            self.db.count_subscriptions_by_status(),
            self.db.count_new_conversions(day_start, day_end),
        )?;

        // Retention cohorts: users who signed up N days before `date`
        // and came back on `date`.
        let (d1, d7, d30) = tokio::try_join!(
            self.retention_cohort(date, 1),
            self.retention_cohort(date, 7),
            self.retention_cohort(date, 30),
        )?;

        // Feature adoption over the MAU window.
        let adoption = futures_util::future::try_join_all(
            ADOPTION_EVENTS
                .iter()
                .map(|event| self.db.count_feature_users(event, mau_start, day_end)),
        )
        .await?;

        let counts = AggregateCounts {
            dau,
            wau,
            mau,
            product_dau,
            product_wau,
            product_mau,
            app_opened_mau,
            new_signups,
            activated_users,
            mrr,
            active_subscriptions: subscription_counts.0,
            trial_subscriptions: subscription_counts.1,
            new_conversions,
            d1_cohort: d1.0,
            d1_returned: d1.1,
            d7_cohort: d7.0,
            d7_returned: d7.1,
            d30_cohort: d30.0,
            d30_returned: d30.1,
            dashboard_users: adoption[0],
            horoscope_users: adoption[1],
            tarot_users: adoption[2],
            chart_users: adoption[3],
            guide_users: adoption[4],
            ritual_users: adoption[5],
        };

        let metrics = DailyMetrics::from_counts(
            date,
            &counts,
            Utc::now(),
            started.elapsed().as_millis() as i64,
        );

        self.db.upsert_daily_metrics(&metrics).await?;

        tracing::info!(
            date = %date,
            dau = metrics.dau,
            mau = metrics.mau,
            mrr = metrics.mrr,
            duration_ms = metrics.computation_duration_ms,
            "Daily metrics computed"
        );

        Ok(metrics)
    }

    /// (cohort size, returned) for users who signed up `days_ago` days
    /// before `date` and had any event on `date`.
    async fn retention_cohort(
        &self,
        date: NaiveDate,
        days_ago: i64,
    ) -> Result<(i64, i64), AppError> {
        let (cohort_start, cohort_end) = day_bounds(date - Duration::days(days_ago));
        let (active_start, active_end) = day_bounds(date);
        self.db
            .count_retained(cohort_start, cohort_end, active_start, active_end)
            .await
    }
}
