//! Daily analytics aggregates for the admin dashboard.
//!
//! One row per day, computed by the metrics cron and upserted keyed by
//! `metric_date`, so dashboard reads never re-run the expensive
//! aggregations over `conversion_events`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Raw counts gathered by the aggregate queries, before deriving rates.
#[derive(Debug, Clone, Default)]
pub struct AggregateCounts {
    pub dau: i64,
    pub wau: i64,
    pub mau: i64,
    /// Signed-in users with product events (excludes app_opened/page_viewed)
    pub product_dau: i64,
    pub product_wau: i64,
    pub product_mau: i64,
    pub app_opened_mau: i64,
    pub new_signups: i64,
    pub activated_users: i64,
    pub mrr: f64,
    pub active_subscriptions: i64,
    pub trial_subscriptions: i64,
    pub new_conversions: i64,
    /// Retention: cohort size and how many returned on day N
    pub d1_cohort: i64,
    pub d1_returned: i64,
    pub d7_cohort: i64,
    pub d7_returned: i64,
    pub d30_cohort: i64,
    pub d30_returned: i64,
    /// Distinct users per tracked feature within the MAU window
    pub dashboard_users: i64,
    pub horoscope_users: i64,
    pub tarot_users: i64,
    pub chart_users: i64,
    pub guide_users: i64,
    pub ritual_users: i64,
}

/// A computed `daily_metrics` row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DailyMetrics {
    pub metric_date: NaiveDate,

    // ─── Active users ────────────────────────────────────────────
    pub dau: i64,
    pub wau: i64,
    pub mau: i64,
    pub signed_in_product_dau: i64,
    pub signed_in_product_wau: i64,
    pub signed_in_product_mau: i64,
    pub app_opened_mau: i64,

    // ─── Growth & activation ─────────────────────────────────────
    pub new_signups: i64,
    pub activated_users: i64,
    /// % of the day's signups that completed a key action within 7 days
    pub activation_rate: f64,

    // ─── Revenue ─────────────────────────────────────────────────
    pub mrr: f64,
    pub active_subscriptions: i64,
    pub trial_subscriptions: i64,
    pub new_conversions: i64,

    // ─── Engagement ratios ───────────────────────────────────────
    /// DAU/MAU as a percentage
    pub stickiness: f64,
    pub avg_active_days_per_week: f64,

    // ─── Retention cohorts ───────────────────────────────────────
    pub d1_retention: f64,
    pub d7_retention: f64,
    pub d30_retention: f64,

    // ─── Feature adoption (% of product MAU) ─────────────────────
    pub dashboard_adoption: f64,
    pub horoscope_adoption: f64,
    pub tarot_adoption: f64,
    pub chart_adoption: f64,
    pub guide_adoption: f64,
    pub ritual_adoption: f64,

    // ─── Metadata ────────────────────────────────────────────────
    pub computed_at: DateTime<Utc>,
    pub computation_duration_ms: i64,
}

impl DailyMetrics {
    /// Derive the full metrics row from raw aggregate counts.
    pub fn from_counts(
        metric_date: NaiveDate,
        counts: &AggregateCounts,
        computed_at: DateTime<Utc>,
        computation_duration_ms: i64,
    ) -> Self {
        Self {
            metric_date,
            dau: counts.dau,
            wau: counts.wau,
            mau: counts.mau,
            signed_in_product_dau: counts.product_dau,
            signed_in_product_wau: counts.product_wau,
            signed_in_product_mau: counts.product_mau,
            app_opened_mau: counts.app_opened_mau,
            new_signups: counts.new_signups,
            activated_users: counts.activated_users,
            activation_rate: ratio_pct(counts.activated_users, counts.new_signups),
            mrr: counts.mrr,
            active_subscriptions: counts.active_subscriptions,
            trial_subscriptions: counts.trial_subscriptions,
            new_conversions: counts.new_conversions,
            stickiness: ratio_pct(counts.dau, counts.mau),
            avg_active_days_per_week: if counts.wau > 0 && counts.dau > 0 {
                counts.dau as f64 / counts.wau as f64 * 7.0
            } else {
                0.0
            },
            d1_retention: ratio_pct(counts.d1_returned, counts.d1_cohort),
            d7_retention: ratio_pct(counts.d7_returned, counts.d7_cohort),
            d30_retention: ratio_pct(counts.d30_returned, counts.d30_cohort),
            dashboard_adoption: ratio_pct(counts.dashboard_users, counts.product_mau),
            horoscope_adoption: ratio_pct(counts.horoscope_users, counts.product_mau),
            tarot_adoption: ratio_pct(counts.tarot_users, counts.product_mau),
            chart_adoption: ratio_pct(counts.chart_users, counts.product_mau),
            guide_adoption: ratio_pct(counts.guide_users, counts.product_mau),
            ritual_adoption: ratio_pct(counts.ritual_users, counts.product_mau),
            computed_at,
            computation_duration_ms,
        }
    }
}

/// numerator/denominator as a percentage, 0 when the denominator is 0.
fn ratio_pct(numerator: i64, denominator: i64) -> f64 {
    if denominator > 0 {
        numerator as f64 / denominator as f64 * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_counts() -> AggregateCounts {
        AggregateCounts {
            dau: 120,
            wau: 400,
            mau: 1000,
            product_dau: 90,
            product_wau: 300,
            product_mau: 800,
            app_opened_mau: 950,
            new_signups: 40,
            activated_users: 18,
            mrr: 1234.5,
            active_subscriptions: 210,
            trial_subscriptions: 35,
            new_conversions: 6,
            d1_cohort: 50,
            d1_returned: 20,
            d7_cohort: 60,
            d7_returned: 15,
            d30_cohort: 80,
            d30_returned: 12,
            dashboard_users: 400,
            horoscope_users: 320,
            tarot_users: 280,
            chart_users: 160,
            guide_users: 96,
            ritual_users: 40,
        }
    }

    fn derive(counts: &AggregateCounts) -> DailyMetrics {
        DailyMetrics::from_counts(
            NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
            counts,
            Utc::now(),
            125,
        )
    }

    #[test]
    fn test_derived_ratios() {
        let metrics = derive(&sample_counts());

        assert_eq!(metrics.stickiness, 12.0); // 120/1000
        assert_eq!(metrics.activation_rate, 45.0); // 18/40
        assert_eq!(metrics.avg_active_days_per_week, 2.1); // 120/400 * 7
        assert_eq!(metrics.d1_retention, 40.0);
        assert_eq!(metrics.d7_retention, 25.0);
        assert_eq!(metrics.d30_retention, 15.0);
        assert_eq!(metrics.dashboard_adoption, 50.0); // 400/800
        assert_eq!(metrics.ritual_adoption, 5.0);
    }

    #[test]
    fn test_zero_denominators_do_not_divide() {
        let metrics = derive(&AggregateCounts::default());

        assert_eq!(metrics.stickiness, 0.0);
        assert_eq!(metrics.activation_rate, 0.0);
        assert_eq!(metrics.avg_active_days_per_week, 0.0);
        assert_eq!(metrics.d30_retention, 0.0);
        assert_eq!(metrics.guide_adoption, 0.0);
    }

    #[test]
    fn test_counts_pass_through() {
        let metrics = derive(&sample_counts());

        assert_eq!(metrics.dau, 120);
        assert_eq!(metrics.signed_in_product_mau, 800);
        assert_eq!(metrics.mrr, 1234.5);
        assert_eq!(metrics.trial_subscriptions, 35);
        assert_eq!(metrics.computation_duration_ms, 125);
    }
}
