//! User and subscription models for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::entitlements::PlanKey;

/// User profile row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Primary key (issued by the auth provider)
    pub id: String,
    /// Email address (may be None if not shared)
    pub email: Option<String>,
    /// Display name
    pub display_name: String,
    /// When the user signed up
    pub created_at: DateTime<Utc>,
    /// Last activity timestamp
    pub last_active: DateTime<Utc>,
}

/// Subscription row, one per paying user.
///
/// `status` mirrors the billing provider's states; only `active`, `trial`
/// and `trialing` count toward MRR.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subscription {
    pub user_id: String,
    pub plan: String,
    pub status: String,
    /// Monthly amount due in whole currency units (annual plans prorated)
    pub monthly_amount_due: f64,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    /// Parse the stored plan string, defaulting unknown values to free.
    pub fn plan_key(&self) -> PlanKey {
        self.plan.parse().unwrap_or(PlanKey::Free)
    }

    /// Whether this subscription counts as revenue-bearing.
    pub fn is_billable(&self) -> bool {
        matches!(self.status.as_str(), "active" | "trial" | "trialing")
    }
}
