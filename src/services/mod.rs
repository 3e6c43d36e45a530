// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod audit;
pub mod generation;
pub mod metrics;
pub mod quota;

pub use audit::{run_audit, AuditFinding};
pub use generation::GenerationClient;
pub use metrics::MetricsService;
pub use quota::DailyQuota;
