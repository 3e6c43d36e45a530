// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cron authentication middleware.
//!
//! `/api/cron/*` routes are called by the platform scheduler with a
//! shared bearer secret. Comparison is constant-time so the secret
//! can't be probed byte by byte.

use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Require `Authorization: Bearer $CRON_SECRET` on cron routes.
pub async fn require_cron_auth(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    let presented = match bearer {
        Some(token) => token,
        None => {
            tracing::warn!("Blocked cron request without bearer token");
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    let expected = state.config.cron_secret.as_bytes();
    if presented.as_bytes().ct_eq(expected).unwrap_u8() != 1 {
        tracing::warn!("Blocked cron request with invalid secret");
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(next.run(request).await)
}
