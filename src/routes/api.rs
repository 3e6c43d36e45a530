// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::entitlements::{self, PlanKey};
use crate::models::{CosmicGift, FriendConnection, FriendInvite, GiftKind};
use crate::social::{Platform, PostType, SourcePack};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/friends", get(list_friends))
        .route("/api/friends/invite", get(list_invites).post(create_invite))
        .route("/api/friends/invite/accept", post(accept_invite))
        .route("/api/gifts", get(list_gifts).post(send_gift))
        .route("/api/gifts/{id}/claim", post(claim_gift))
        .route("/api/analytics/snapshot", get(analytics_snapshot))
        .route("/api/social/generate", post(generate_social))
}

/// Resolve a user's plan from their latest billable subscription.
async fn plan_for(state: &AppState, user_id: &str) -> Result<PlanKey> {
    Ok(state
        .db
        .get_subscription(user_id)
        .await?
        .map(|s| s.plan_key())
        .unwrap_or(PlanKey::Free))
}

// ─── User Profile ────────────────────────────────────────────

/// Current user response with entitlement summary.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    pub user_id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub plan: String,
    pub features: Vec<String>,
    pub chat_limit_per_day: u32,
    /// None means unlimited
    pub friend_limit: Option<u32>,
}

/// Get current user profile and entitlements.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let profile = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    let plan = plan_for(&state, &user.user_id).await?;

    Ok(Json(UserResponse {
        user_id: profile.id,
        display_name: profile.display_name,
        email: profile.email,
        plan: plan.to_string(),
        features: entitlements::features_for(plan)
            .iter()
            .map(|f| f.to_string())
            .collect(),
        chat_limit_per_day: entitlements::chat_limit(plan),
        friend_limit: entitlements::friend_limit(plan),
    }))
}

// ─── Friend invites ──────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct InviteResponse {
    pub code: String,
    pub created_at: String,
    pub expires_at: String,
}

impl From<FriendInvite> for InviteResponse {
    fn from(invite: FriendInvite) -> Self {
        Self {
            code: invite.code,
            created_at: format_utc_rfc3339(invite.created_at),
            expires_at: format_utc_rfc3339(invite.expires_at),
        }
    }
}

/// Create a single-use invite code (expires in 7 days).
async fn create_invite(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<InviteResponse>> {
    let plan = plan_for(&state, &user.user_id).await?;

    // Friend limit applies before handing out codes
    if let Some(limit) = entitlements::friend_limit(plan) {
        let current = state.db.count_connections(&user.user_id).await?;
        if current >= limit as i64 {
            return Err(AppError::Forbidden(format!(
                "Friend limit reached ({} on the {} plan)",
                limit, plan
            )));
        }
    }

    let invite = FriendInvite::new(&user.user_id, chrono::Utc::now());
    state.db.create_invite(&invite).await?;

    tracing::info!(user_id = %user.user_id, code = %invite.code, "Friend invite created");

    Ok(Json(invite.into()))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct InviteListResponse {
    pub invites: Vec<InviteResponse>,
}

/// List the caller's pending (unused, unexpired) invites.
async fn list_invites(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<InviteListResponse>> {
    let invites = state
        .db
        .pending_invites_for(&user.user_id, chrono::Utc::now())
        .await?;

    Ok(Json(InviteListResponse {
        invites: invites.into_iter().map(Into::into).collect(),
    }))
}

#[derive(Deserialize, Validate)]
struct AcceptInviteRequest {
    #[validate(length(min = 1, max = 64))]
    code: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AcceptInviteResponse {
    pub friend_id: String,
}

/// Accept an invite code, consuming it and connecting the two users.
async fn accept_invite(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<AcceptInviteRequest>,
) -> Result<Json<AcceptInviteResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let now = chrono::Utc::now();
    let invite = state
        .db
        .get_invite(&payload.code)
        .await?
        .ok_or_else(|| AppError::NotFound("Invite code".to_string()))?;

    if invite.inviter_id == user.user_id {
        return Err(AppError::BadRequest(
            "You cannot accept your own invite".to_string(),
        ));
    }

    let plan = plan_for(&state, &user.user_id).await?;
    if let Some(limit) = entitlements::friend_limit(plan) {
        let current = state.db.count_connections(&user.user_id).await?;
        if current >= limit as i64 {
            return Err(AppError::Forbidden(format!(
                "Friend limit reached ({} on the {} plan)",
                limit, plan
            )));
        }
    }

    // Atomic consume: fails for expired or already-used codes, and for
    // concurrent accepts all but one caller lose here.
    let consumed = state
        .db
        .mark_invite_used(&payload.code, &user.user_id, now)
        .await?;
    if !consumed {
        return Err(AppError::BadRequest(
            "Invite code is expired or already used".to_string(),
        ));
    }

    let connection = FriendConnection::between(&invite.inviter_id, &user.user_id, now);
    state.db.insert_connection(&connection).await?;

    tracing::info!(
        user_id = %user.user_id,
        inviter_id = %invite.inviter_id,
        "Friend invite accepted"
    );

    Ok(Json(AcceptInviteResponse {
        friend_id: invite.inviter_id,
    }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FriendListResponse {
    pub friends: Vec<FriendSummary>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FriendSummary {
    pub user_id: String,
    pub connected_at: String,
}

/// List the caller's friend connections.
async fn list_friends(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<FriendListResponse>> {
    let connections = state.db.list_connections(&user.user_id).await?;

    let friends = connections
        .iter()
        .filter_map(|c| {
            c.other(&user.user_id).map(|other| FriendSummary {
                user_id: other.to_string(),
                connected_at: format_utc_rfc3339(c.connected_at),
            })
        })
        .collect();

    Ok(Json(FriendListResponse { friends }))
}

// ─── Cosmic gifts ────────────────────────────────────────────

#[derive(Deserialize, Validate)]
struct SendGiftRequest {
    #[validate(length(min = 1, max = 64))]
    recipient_id: String,
    kind: GiftKind,
    #[validate(length(max = 280))]
    message: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GiftResponse {
    pub id: String,
    pub sender_id: String,
    pub kind: String,
    pub message: Option<String>,
    pub created_at: String,
    pub claimed: bool,
}

impl From<CosmicGift> for GiftResponse {
    fn from(gift: CosmicGift) -> Self {
        Self {
            id: gift.id.to_string(),
            sender_id: gift.sender_id.clone(),
            kind: gift.kind.clone(),
            message: gift.message.clone(),
            created_at: format_utc_rfc3339(gift.created_at),
            claimed: gift.is_claimed(),
        }
    }
}

/// Send a cosmic gift to a connected friend.
async fn send_gift(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<SendGiftRequest>,
) -> Result<Json<GiftResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if payload.recipient_id == user.user_id {
        return Err(AppError::BadRequest(
            "You cannot send a gift to yourself".to_string(),
        ));
    }

    if !state
        .db
        .are_connected(&user.user_id, &payload.recipient_id)
        .await?
    {
        return Err(AppError::BadRequest(
            "Gifts can only be sent to connected friends".to_string(),
        ));
    }

    let gift = CosmicGift::new(
        &user.user_id,
        &payload.recipient_id,
        payload.kind,
        payload.message,
        chrono::Utc::now(),
    );
    state.db.insert_gift(&gift).await?;

    tracing::info!(
        sender = %user.user_id,
        recipient = %payload.recipient_id,
        kind = %gift.kind,
        "Cosmic gift sent"
    );

    Ok(Json(gift.into()))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GiftListResponse {
    pub gifts: Vec<GiftResponse>,
}

/// List gifts the caller has received.
async fn list_gifts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<GiftListResponse>> {
    let gifts = state.db.gifts_for_recipient(&user.user_id).await?;
    Ok(Json(GiftListResponse {
        gifts: gifts.into_iter().map(Into::into).collect(),
    }))
}

/// Claim a received gift.
async fn claim_gift(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<GiftResponse>> {
    let gift = state
        .db
        .get_gift(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Gift {}", id)))?;

    if gift.recipient_id != user.user_id {
        return Err(AppError::Forbidden(
            "Only the recipient can claim a gift".to_string(),
        ));
    }

    let claimed = state
        .db
        .claim_gift(id, &user.user_id, chrono::Utc::now())
        .await?;
    if !claimed {
        return Err(AppError::BadRequest("Gift already claimed".to_string()));
    }

    let gift = state
        .db
        .get_gift(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Gift {}", id)))?;

    Ok(Json(gift.into()))
}

// ─── Analytics snapshot ──────────────────────────────────────

#[derive(Deserialize)]
struct SnapshotQuery {
    /// Days of history to include
    #[serde(default = "default_snapshot_days")]
    days: u32,
}

fn default_snapshot_days() -> u32 {
    30
}

const MAX_SNAPSHOT_DAYS: u32 = 90;

#[derive(Serialize)]
pub struct SnapshotResponse {
    pub days: Vec<crate::models::DailyMetrics>,
    pub latest: Option<crate::models::DailyMetrics>,
}

/// Consolidated metrics bundle for the admin dashboard: one call
/// instead of one request per chart.
async fn analytics_snapshot(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<SnapshotQuery>,
) -> Result<Json<SnapshotResponse>> {
    require_admin(&state, &user)?;

    let days = params.days.min(MAX_SNAPSHOT_DAYS);
    let rows = state.db.recent_daily_metrics(days as i64).await?;
    let latest = rows.first().cloned();

    Ok(Json(SnapshotResponse { days: rows, latest }))
}

// ─── Social copy generation ──────────────────────────────────

#[derive(Deserialize, Validate)]
struct GenerateRequest {
    /// Grimoire slug or free-text topic
    #[validate(length(min = 1, max = 120))]
    topic: String,
    platform: String,
    post_type: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GenerateResponse {
    pub body: String,
    pub hashtags: Vec<String>,
    pub rendered: String,
    pub attempts: u32,
    pub used_fallback: bool,
    pub remaining_today: u32,
}

/// Generate social copy for a Grimoire topic (admin tooling).
async fn generate_social(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>> {
    require_admin(&state, &user)?;
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let platform: Platform = payload
        .platform
        .parse()
        .map_err(|e: String| AppError::BadRequest(e))?;
    let post_type: PostType = payload
        .post_type
        .parse()
        .map_err(|e: String| AppError::BadRequest(e))?;

    let snippet = state
        .grimoire
        .by_slug(&payload.topic)
        .or_else(|| state.grimoire.search(&payload.topic, 1).into_iter().next())
        .ok_or_else(|| AppError::NotFound(format!("Grimoire topic \"{}\"", payload.topic)))?;

    // Generation shares the plan's daily chat budget
    let plan = plan_for(&state, &user.user_id).await?;
    let limit = entitlements::chat_limit(plan);
    let used = state
        .quota
        .try_consume(&user.user_id, limit)
        .ok_or_else(|| {
            AppError::RateLimited(format!("Daily generation limit of {} reached", limit))
        })?;

    let pack = SourcePack::from_snippet(snippet);
    let outcome = state.generator.generate(&pack, platform, post_type).await;

    tracing::info!(
        topic = %pack.topic,
        platform = %platform,
        attempts = outcome.attempts,
        used_fallback = outcome.used_fallback,
        "Social copy generated"
    );

    Ok(Json(GenerateResponse {
        rendered: outcome.post.rendered(),
        body: outcome.post.body,
        hashtags: outcome.post.hashtags,
        attempts: outcome.attempts,
        used_fallback: outcome.used_fallback,
        remaining_today: limit.saturating_sub(used),
    }))
}

/// Admin gate for analytics and social tooling.
fn require_admin(state: &AppState, user: &AuthUser) -> Result<()> {
    if state.config.is_admin(user.email.as_deref()) {
        Ok(())
    } else {
        Err(AppError::Forbidden("Admin access required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_require_admin_checks_email() {
        let state = AppState::for_tests(Config::test_default());

        let admin = AuthUser {
            user_id: "u1".to_string(),
            email: Some("admin@lunary.app".to_string()),
        };
        assert!(require_admin(&state, &admin).is_ok());

        let visitor = AuthUser {
            user_id: "u2".to_string(),
            email: Some("visitor@example.com".to_string()),
        };
        assert!(require_admin(&state, &visitor).is_err());

        let anonymous = AuthUser {
            user_id: "u3".to_string(),
            email: None,
        };
        assert!(require_admin(&state, &anonymous).is_err());
    }
}
