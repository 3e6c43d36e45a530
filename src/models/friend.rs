// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Friend invites and connections.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Invites expire this many days after creation.
pub const INVITE_TTL_DAYS: i64 = 7;

/// Random bytes per invite code (16 bytes → 22 URL-safe chars).
const INVITE_CODE_BYTES: usize = 16;

/// A friend invite. Single-use: `used_by` is set exactly once.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FriendInvite {
    pub code: String,
    pub inviter_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used_by: Option<String>,
    pub used_at: Option<DateTime<Utc>>,
}

impl FriendInvite {
    /// Create a fresh invite for a user, expiring in [`INVITE_TTL_DAYS`].
    pub fn new(inviter_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            code: generate_invite_code(),
            inviter_id: inviter_id.to_string(),
            created_at: now,
            expires_at: now + Duration::days(INVITE_TTL_DAYS),
            used_by: None,
            used_at: None,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_used(&self) -> bool {
        self.used_by.is_some()
    }

    /// Whether the invite can still be accepted.
    pub fn is_pending(&self, now: DateTime<Utc>) -> bool {
        !self.is_used() && !self.is_expired(now)
    }
}

/// Generate an opaque URL-safe invite code.
fn generate_invite_code() -> String {
    let mut bytes = [0u8; INVITE_CODE_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// An accepted friend connection. Stored once per pair with the two user
/// ids in sorted order so the pair is unique regardless of direction.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FriendConnection {
    pub user_a: String,
    pub user_b: String,
    pub connected_at: DateTime<Utc>,
}

impl FriendConnection {
    /// Build a connection with canonical (sorted) member order.
    pub fn between(first: &str, second: &str, now: DateTime<Utc>) -> Self {
        let (user_a, user_b) = if first <= second {
            (first.to_string(), second.to_string())
        } else {
            (second.to_string(), first.to_string())
        };
        Self {
            user_a,
            user_b,
            connected_at: now,
        }
    }

    /// The other member of the pair, if `user_id` is a member.
    pub fn other(&self, user_id: &str) -> Option<&str> {
        if self.user_a == user_id {
            Some(&self.user_b)
        } else if self.user_b == user_id {
            Some(&self.user_a)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_expires_after_seven_days() {
        let now = Utc::now();
        let invite = FriendInvite::new("user_1", now);

        assert!(invite.is_pending(now));
        assert!(invite.is_pending(now + Duration::days(INVITE_TTL_DAYS) - Duration::seconds(1)));
        assert!(invite.is_expired(now + Duration::days(INVITE_TTL_DAYS)));
        assert!(!invite.is_pending(now + Duration::days(INVITE_TTL_DAYS)));
    }

    #[test]
    fn test_used_invite_is_not_pending() {
        let now = Utc::now();
        let mut invite = FriendInvite::new("user_1", now);
        invite.used_by = Some("user_2".to_string());
        invite.used_at = Some(now);

        assert!(invite.is_used());
        assert!(!invite.is_pending(now));
    }

    #[test]
    fn test_invite_codes_are_unique_and_url_safe() {
        let now = Utc::now();
        let a = FriendInvite::new("user_1", now);
        let b = FriendInvite::new("user_1", now);

        assert_ne!(a.code, b.code);
        assert_eq!(a.code.len(), 22);
        assert!(a
            .code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_connection_order_is_canonical() {
        let now = Utc::now();
        let ab = FriendConnection::between("alice", "bob", now);
        let ba = FriendConnection::between("bob", "alice", now);

        assert_eq!(ab.user_a, ba.user_a);
        assert_eq!(ab.user_b, ba.user_b);
        assert_eq!(ab.other("alice"), Some("bob"));
        assert_eq!(ab.other("carol"), None);
    }
}
