//! In-process daily usage quotas.
//!
//! Counters are per (user, UTC day) and shared across all requests
//! within one server instance. A restart resets them, which errs on
//! the permissive side; the hard protection is the plan limit itself.

use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use std::sync::Arc;

/// Shared daily counter map keyed by user id.
#[derive(Clone, Default)]
pub struct DailyQuota {
    counters: Arc<DashMap<String, (NaiveDate, u32)>>,
}

impl DailyQuota {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one use for today. Returns the updated count if within
    /// `limit`, or `None` when the quota is already exhausted.
    pub fn try_consume(&self, user_id: &str, limit: u32) -> Option<u32> {
        self.try_consume_on(user_id, limit, Utc::now().date_naive())
    }

    /// Like [`try_consume`] with an explicit day (tests).
    pub fn try_consume_on(&self, user_id: &str, limit: u32, today: NaiveDate) -> Option<u32> {
        let mut entry = self
            .counters
            .entry(user_id.to_string())
            .or_insert((today, 0));

        // Day rolled over since the last use
        if entry.0 != today {
            *entry = (today, 0);
        }

        if entry.1 >= limit {
            return None;
        }
        entry.1 += 1;
        Some(entry.1)
    }

    /// Uses recorded today for a user.
    pub fn used_today(&self, user_id: &str) -> u32 {
        let today = Utc::now().date_naive();
        self.counters
            .get(user_id)
            .filter(|entry| entry.0 == today)
            .map(|entry| entry.1)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn test_quota_exhausts_at_limit() {
        let quota = DailyQuota::new();

        assert_eq!(quota.try_consume_on("user_1", 3, day(1)), Some(1));
        assert_eq!(quota.try_consume_on("user_1", 3, day(1)), Some(2));
        assert_eq!(quota.try_consume_on("user_1", 3, day(1)), Some(3));
        assert_eq!(quota.try_consume_on("user_1", 3, day(1)), None);
    }

    #[test]
    fn test_quota_resets_on_new_day() {
        let quota = DailyQuota::new();

        for _ in 0..3 {
            quota.try_consume_on("user_1", 3, day(1));
        }
        assert_eq!(quota.try_consume_on("user_1", 3, day(1)), None);
        assert_eq!(quota.try_consume_on("user_1", 3, day(2)), Some(1));
    }

    #[test]
    fn test_quota_is_per_user() {
        let quota = DailyQuota::new();

        assert_eq!(quota.try_consume_on("user_1", 1, day(1)), Some(1));
        assert_eq!(quota.try_consume_on("user_1", 1, day(1)), None);
        assert_eq!(quota.try_consume_on("user_2", 1, day(1)), Some(1));
    }
}
