// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod entitlements;
pub mod friend;
pub mod gift;
pub mod metrics;
pub mod user;

pub use entitlements::PlanKey;
pub use friend::{FriendConnection, FriendInvite};
pub use gift::{CosmicGift, GiftKind};
pub use metrics::DailyMetrics;
pub use user::{Subscription, User};
