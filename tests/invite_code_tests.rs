// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Invite code semantics: single-use, 7-day expiry, opaque codes.

use chrono::{Duration, Utc};
use lunary_api::models::friend::{FriendConnection, FriendInvite, INVITE_TTL_DAYS};

#[test]
fn test_invite_ttl_is_seven_days() {
    assert_eq!(INVITE_TTL_DAYS, 7);

    let now = Utc::now();
    let invite = FriendInvite::new("user_1", now);
    assert_eq!(invite.expires_at - invite.created_at, Duration::days(7));
}

#[test]
fn test_invite_expiry_boundary() {
    let now = Utc::now();
    let invite = FriendInvite::new("user_1", now);

    let one_second_before = invite.expires_at - Duration::seconds(1);
    assert!(invite.is_pending(one_second_before));

    // Expiry instant itself is expired
    assert!(invite.is_expired(invite.expires_at));
    assert!(!invite.is_pending(invite.expires_at));
}

#[test]
fn test_codes_do_not_repeat() {
    let now = Utc::now();
    let mut codes = std::collections::HashSet::new();
    for _ in 0..256 {
        assert!(codes.insert(FriendInvite::new("user_1", now).code));
    }
}

#[test]
fn test_codes_are_opaque_and_url_safe() {
    let invite = FriendInvite::new("user_1", Utc::now());

    // 16 random bytes → 22 chars, no padding, URL-safe alphabet
    assert_eq!(invite.code.len(), 22);
    assert!(invite
        .code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    // Codes never embed the inviter id
    assert!(!invite.code.contains("user_1"));
}

#[test]
fn test_connection_pair_is_direction_independent() {
    let now = Utc::now();
    let ab = FriendConnection::between("zara", "amir", now);

    assert_eq!(ab.user_a, "amir");
    assert_eq!(ab.user_b, "zara");
    assert_eq!(ab.other("zara"), Some("amir"));
    assert_eq!(ab.other("amir"), Some("zara"));
}
