// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Postgres access layer.
//!
//! All SQL lives here; callers get typed methods. Aggregate queries for
//! the metrics cron exclude test accounts (`%@test.lunary.app`) so
//! internal traffic never skews the dashboard.

use crate::error::AppError;
use crate::models::{CosmicGift, DailyMetrics, FriendConnection, FriendInvite, Subscription, User};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Wildcard matching all test-account emails.
const TEST_EMAIL_PATTERN: &str = "%@test.lunary.app";
const TEST_EMAIL_EXACT: &str = "test@test.lunary.app";

/// Postgres database handle (cheap to clone; wraps a pool).
#[derive(Clone)]
pub struct PgDb {
    pool: PgPool,
}

impl PgDb {
    /// Connect and verify the connection.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect: {}", e)))?;
        Ok(Self { pool })
    }

    /// Create a handle without connecting (connections are established
    /// on first use). Used by tests that exercise non-DB paths.
    pub fn connect_lazy(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_lazy(database_url)
            .map_err(|e| AppError::Database(format!("Invalid database URL: {}", e)))?;
        Ok(Self { pool })
    }

    /// Run pending migrations.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {}", e)))?;
        Ok(())
    }

    // ─── Users & subscriptions ───────────────────────────────────────

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, display_name, created_at, last_active
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Insert or refresh a user profile (synced from the auth provider).
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, display_name, created_at, last_active)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id)
            DO UPDATE SET
              email = EXCLUDED.email,
              display_name = EXCLUDED.display_name,
              last_active = EXCLUDED.last_active
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(user.created_at)
        .bind(user.last_active)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Record one conversion event (the raw material for metrics).
    pub async fn record_event(
        &self,
        user_id: &str,
        user_email: Option<&str>,
        event_type: &str,
        created_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO conversion_events (user_id, user_email, event_type, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user_id)
        .bind(user_email)
        .bind(event_type)
        .bind(created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Latest billable subscription for a user, if any.
    pub async fn get_subscription(&self, user_id: &str) -> Result<Option<Subscription>, AppError> {
        let subscription = sqlx::query_as::<_, Subscription>(
            r#"
            SELECT user_id, plan, status, monthly_amount_due, created_at
            FROM subscriptions
            WHERE user_id = $1
              AND status IN ('active', 'trial', 'trialing')
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(subscription)
    }

    // ─── Friend invites & connections ────────────────────────────────

    pub async fn create_invite(&self, invite: &FriendInvite) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO friend_invites (code, inviter_id, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&invite.code)
        .bind(&invite.inviter_id)
        .bind(invite.created_at)
        .bind(invite.expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_invite(&self, code: &str) -> Result<Option<FriendInvite>, AppError> {
        let invite = sqlx::query_as::<_, FriendInvite>(
            r#"
            SELECT code, inviter_id, created_at, expires_at, used_by, used_at
            FROM friend_invites
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(invite)
    }

    pub async fn pending_invites_for(
        &self,
        inviter_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<FriendInvite>, AppError> {
        let invites = sqlx::query_as::<_, FriendInvite>(
            r#"
            SELECT code, inviter_id, created_at, expires_at, used_by, used_at
            FROM friend_invites
            WHERE inviter_id = $1
              AND used_by IS NULL
              AND expires_at > $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(inviter_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        Ok(invites)
    }

    /// Consume an invite. Single-use is enforced here: the UPDATE only
    /// matches while `used_by` is NULL and the code is unexpired, so
    /// concurrent accepts race safely and exactly one wins.
    pub async fn mark_invite_used(
        &self,
        code: &str,
        used_by: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE friend_invites
            SET used_by = $2, used_at = $3
            WHERE code = $1
              AND used_by IS NULL
              AND expires_at > $3
            "#,
        )
        .bind(code)
        .bind(used_by)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    pub async fn insert_connection(&self, connection: &FriendConnection) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO friend_connections (user_a, user_b, connected_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_a, user_b) DO NOTHING
            "#,
        )
        .bind(&connection.user_a)
        .bind(&connection.user_b)
        .bind(connection.connected_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn count_connections(&self, user_id: &str) -> Result<i64, AppError> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS count
            FROM friend_connections
            WHERE user_a = $1 OR user_b = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get::<i64, _>("count"))
    }

    pub async fn are_connected(&self, first: &str, second: &str) -> Result<bool, AppError> {
        let (user_a, user_b) = if first <= second {
            (first, second)
        } else {
            (second, first)
        };
        let row = sqlx::query(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM friend_connections WHERE user_a = $1 AND user_b = $2
            ) AS connected
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get::<bool, _>("connected"))
    }

    pub async fn list_connections(&self, user_id: &str) -> Result<Vec<FriendConnection>, AppError> {
        let connections = sqlx::query_as::<_, FriendConnection>(
            r#"
            SELECT user_a, user_b, connected_at
            FROM friend_connections
            WHERE user_a = $1 OR user_b = $1
            ORDER BY connected_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(connections)
    }

    // ─── Cosmic gifts ────────────────────────────────────────────────

    pub async fn insert_gift(&self, gift: &CosmicGift) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO cosmic_gifts (id, sender_id, recipient_id, kind, message, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(gift.id)
        .bind(&gift.sender_id)
        .bind(&gift.recipient_id)
        .bind(&gift.kind)
        .bind(&gift.message)
        .bind(gift.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_gift(&self, id: Uuid) -> Result<Option<CosmicGift>, AppError> {
        let gift = sqlx::query_as::<_, CosmicGift>(
            r#"
            SELECT id, sender_id, recipient_id, kind, message, created_at, claimed_at
            FROM cosmic_gifts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(gift)
    }

    pub async fn gifts_for_recipient(&self, user_id: &str) -> Result<Vec<CosmicGift>, AppError> {
        let gifts = sqlx::query_as::<_, CosmicGift>(
            r#"
            SELECT id, sender_id, recipient_id, kind, message, created_at, claimed_at
            FROM cosmic_gifts
            WHERE recipient_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(gifts)
    }

    /// Claim a gift; matches only while unclaimed so double-claims lose.
    pub async fn claim_gift(
        &self,
        id: Uuid,
        recipient_id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE cosmic_gifts
            SET claimed_at = $3
            WHERE id = $1
              AND recipient_id = $2
              AND claimed_at IS NULL
            "#,
        )
        .bind(id)
        .bind(recipient_id)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    // ─── Metric aggregates ───────────────────────────────────────────
    //
    // Each aggregate is one parameterized query; the metrics service
    // fires them concurrently and derives rates from the counts.

    /// Distinct signed-in users with any event in the window.
    pub async fn count_active_users(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(DISTINCT user_id) AS count
            FROM conversion_events
            WHERE created_at >= $1 AND created_at <= $2
              AND user_id IS NOT NULL
              AND user_id NOT LIKE 'anon:%'
              AND (user_email IS NULL OR (user_email NOT LIKE $3 AND user_email != $4))
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(TEST_EMAIL_PATTERN)
        .bind(TEST_EMAIL_EXACT)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get::<i64, _>("count"))
    }

    /// Distinct users with product events (excludes passive events).
    pub async fn count_product_active_users(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(DISTINCT user_id) AS count
            FROM conversion_events
            WHERE created_at >= $1 AND created_at <= $2
              AND user_id IS NOT NULL
              AND user_id NOT LIKE 'anon:%'
              AND event_type NOT IN ('app_opened', 'page_viewed')
              AND (user_email IS NULL OR (user_email NOT LIKE $3 AND user_email != $4))
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(TEST_EMAIL_PATTERN)
        .bind(TEST_EMAIL_EXACT)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get::<i64, _>("count"))
    }

    /// Distinct users with an `app_opened` event in the window.
    pub async fn count_app_opened_users(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(DISTINCT user_id) AS count
            FROM conversion_events
            WHERE created_at >= $1 AND created_at <= $2
              AND event_type = 'app_opened'
              AND user_id IS NOT NULL
              AND user_id NOT LIKE 'anon:%'
              AND (user_email IS NULL OR (user_email NOT LIKE $3 AND user_email != $4))
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(TEST_EMAIL_PATTERN)
        .bind(TEST_EMAIL_EXACT)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get::<i64, _>("count"))
    }

    /// Users created in the window.
    pub async fn count_new_signups(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS count
            FROM users
            WHERE created_at >= $1 AND created_at <= $2
              AND (email IS NULL OR (email NOT LIKE $3 AND email != $4))
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(TEST_EMAIL_PATTERN)
        .bind(TEST_EMAIL_EXACT)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get::<i64, _>("count"))
    }

    /// Users signed up in the window who completed a key action within
    /// 7 days of signup.
    pub async fn count_activated_users(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(DISTINCT u.id) AS count
            FROM users u
            INNER JOIN conversion_events ce ON ce.user_id = u.id
            WHERE u.created_at >= $1 AND u.created_at <= $2
              AND ce.event_type IN ('chart_viewed', 'personalized_horoscope_viewed', 'tarot_drawn')
              AND ce.created_at <= u.created_at + INTERVAL '7 days'
              AND (u.email IS NULL OR (u.email NOT LIKE $3 AND u.email != $4))
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(TEST_EMAIL_PATTERN)
        .bind(TEST_EMAIL_EXACT)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get::<i64, _>("count"))
    }

    /// Monthly recurring revenue over billable subscriptions.
    pub async fn sum_mrr(&self) -> Result<f64, AppError> {
        let row = sqlx::query(
            r#"
            SELECT COALESCE(SUM(COALESCE(s.monthly_amount_due, 0)), 0)::DOUBLE PRECISION AS mrr
            FROM subscriptions s
            LEFT JOIN users u ON u.id = s.user_id
            WHERE s.status IN ('active', 'trial', 'trialing')
              AND (u.email IS NULL OR (u.email NOT LIKE $1 AND u.email != $2))
            "#,
        )
        .bind(TEST_EMAIL_PATTERN)
        .bind(TEST_EMAIL_EXACT)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get::<f64, _>("mrr"))
    }

    /// (active, trial) subscription counts.
    pub async fn count_subscriptions_by_status(&self) -> Result<(i64, i64), AppError> {
        let row = sqlx::query(
            r#"
            SELECT
              COUNT(*) FILTER (WHERE s.status = 'active') AS active,
              COUNT(*) FILTER (WHERE s.status IN ('trial', 'trialing')) AS trial
            FROM subscriptions s
            LEFT JOIN users u ON u.id = s.user_id
            WHERE (u.email IS NULL OR (u.email NOT LIKE $1 AND u.email != $2))
            "#,
        )
        .bind(TEST_EMAIL_PATTERN)
        .bind(TEST_EMAIL_EXACT)
        .fetch_one(&self.pool)
        .await?;
        Ok((row.get::<i64, _>("active"), row.get::<i64, _>("trial")))
    }

    /// Distinct users who started a subscription in the window.
    pub async fn count_new_conversions(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(DISTINCT s.user_id) AS count
            FROM subscriptions s
            INNER JOIN users u ON u.id = s.user_id
            WHERE s.created_at >= $1 AND s.created_at <= $2
              AND (u.email IS NULL OR (u.email NOT LIKE $3 AND u.email != $4))
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(TEST_EMAIL_PATTERN)
        .bind(TEST_EMAIL_EXACT)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get::<i64, _>("count"))
    }

    /// Distinct users with one feature's event in the window.
    pub async fn count_feature_users(
        &self,
        event_type: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(DISTINCT user_id) AS count
            FROM conversion_events
            WHERE created_at >= $1 AND created_at <= $2
              AND event_type = $5
              AND user_id IS NOT NULL
              AND user_id NOT LIKE 'anon:%'
              AND (user_email IS NULL OR (user_email NOT LIKE $3 AND user_email != $4))
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(TEST_EMAIL_PATTERN)
        .bind(TEST_EMAIL_EXACT)
        .bind(event_type)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get::<i64, _>("count"))
    }

    /// Retention: (cohort size, returned) for users created in the
    /// cohort window, counting those with events in the active window.
    pub async fn count_retained(
        &self,
        cohort_start: DateTime<Utc>,
        cohort_end: DateTime<Utc>,
        active_start: DateTime<Utc>,
        active_end: DateTime<Utc>,
    ) -> Result<(i64, i64), AppError> {
        let row = sqlx::query(
            r#"
            SELECT
              COUNT(DISTINCT u.id) AS cohort,
              COUNT(DISTINCT u.id) FILTER (
                WHERE EXISTS (
                  SELECT 1 FROM conversion_events ce
                  WHERE ce.user_id = u.id
                    AND ce.created_at >= $3 AND ce.created_at <= $4
                )
              ) AS returned
            FROM users u
            WHERE u.created_at >= $1 AND u.created_at <= $2
              AND (u.email IS NULL OR (u.email NOT LIKE $5 AND u.email != $6))
            "#,
        )
        .bind(cohort_start)
        .bind(cohort_end)
        .bind(active_start)
        .bind(active_end)
        .bind(TEST_EMAIL_PATTERN)
        .bind(TEST_EMAIL_EXACT)
        .fetch_one(&self.pool)
        .await?;
        Ok((row.get::<i64, _>("cohort"), row.get::<i64, _>("returned")))
    }

    // ─── Daily metrics rows ──────────────────────────────────────────

    /// Upsert the computed row for its metric_date. Re-running a day
    /// updates the existing row, never duplicates it.
    pub async fn upsert_daily_metrics(&self, metrics: &DailyMetrics) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO daily_metrics (
              metric_date,
              dau, wau, mau,
              signed_in_product_dau, signed_in_product_wau, signed_in_product_mau,
              app_opened_mau,
              new_signups, activated_users, activation_rate,
              mrr, active_subscriptions, trial_subscriptions, new_conversions,
              stickiness, avg_active_days_per_week,
              d1_retention, d7_retention, d30_retention,
              dashboard_adoption, horoscope_adoption, tarot_adoption,
              chart_adoption, guide_adoption, ritual_adoption,
              computed_at, computation_duration_ms
            ) VALUES (
              $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
              $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28
            )
            ON CONFLICT (metric_date)
            DO UPDATE SET
              dau = EXCLUDED.dau,
              wau = EXCLUDED.wau,
              mau = EXCLUDED.mau,
              signed_in_product_dau = EXCLUDED.signed_in_product_dau,
              signed_in_product_wau = EXCLUDED.signed_in_product_wau,
              signed_in_product_mau = EXCLUDED.signed_in_product_mau,
              app_opened_mau = EXCLUDED.app_opened_mau,
              new_signups = EXCLUDED.new_signups,
              activated_users = EXCLUDED.activated_users,
              activation_rate = EXCLUDED.activation_rate,
              mrr = EXCLUDED.mrr,
              active_subscriptions = EXCLUDED.active_subscriptions,
              trial_subscriptions = EXCLUDED.trial_subscriptions,
              new_conversions = EXCLUDED.new_conversions,
              stickiness = EXCLUDED.stickiness,
              avg_active_days_per_week = EXCLUDED.avg_active_days_per_week,
              d1_retention = EXCLUDED.d1_retention,
              d7_retention = EXCLUDED.d7_retention,
              d30_retention = EXCLUDED.d30_retention,
              dashboard_adoption = EXCLUDED.dashboard_adoption,
              horoscope_adoption = EXCLUDED.horoscope_adoption,
              tarot_adoption = EXCLUDED.tarot_adoption,
              chart_adoption = EXCLUDED.chart_adoption,
              guide_adoption = EXCLUDED.guide_adoption,
              ritual_adoption = EXCLUDED.ritual_adoption,
              computed_at = EXCLUDED.computed_at,
              computation_duration_ms = EXCLUDED.computation_duration_ms
            "#,
        )
        .bind(metrics.metric_date)
        .bind(metrics.dau)
        .bind(metrics.wau)
        .bind(metrics.mau)
        .bind(metrics.signed_in_product_dau)
        .bind(metrics.signed_in_product_wau)
        .bind(metrics.signed_in_product_mau)
        .bind(metrics.app_opened_mau)
        .bind(metrics.new_signups)
        .bind(metrics.activated_users)
        .bind(metrics.activation_rate)
        .bind(metrics.mrr)
        .bind(metrics.active_subscriptions)
        .bind(metrics.trial_subscriptions)
        .bind(metrics.new_conversions)
        .bind(metrics.stickiness)
        .bind(metrics.avg_active_days_per_week)
        .bind(metrics.d1_retention)
        .bind(metrics.d7_retention)
        .bind(metrics.d30_retention)
        .bind(metrics.dashboard_adoption)
        .bind(metrics.horoscope_adoption)
        .bind(metrics.tarot_adoption)
        .bind(metrics.chart_adoption)
        .bind(metrics.guide_adoption)
        .bind(metrics.ritual_adoption)
        .bind(metrics.computed_at)
        .bind(metrics.computation_duration_ms)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_daily_metrics(
        &self,
        date: NaiveDate,
    ) -> Result<Option<DailyMetrics>, AppError> {
        let metrics = sqlx::query_as::<_, DailyMetrics>(
            r#"SELECT * FROM daily_metrics WHERE metric_date = $1"#,
        )
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(metrics)
    }

    /// Most recent metric rows, newest first.
    pub async fn recent_daily_metrics(&self, limit: i64) -> Result<Vec<DailyMetrics>, AppError> {
        let rows = sqlx::query_as::<_, DailyMetrics>(
            r#"
            SELECT * FROM daily_metrics
            ORDER BY metric_date DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
