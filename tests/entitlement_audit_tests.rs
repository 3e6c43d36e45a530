// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Entitlement audit properties: marketing copy and the entitlement
//! tables must agree, and the audit must hold as the tables evolve.

use lunary_api::models::entitlements::{
    chat_limit, features_for, friend_limit, pricing_plan, PlanKey, PRICING_PLANS,
};
use lunary_api::services::run_audit;

/// The audit over the shipped tables finds nothing.
#[test]
fn test_audit_is_clean() {
    let findings = run_audit();
    assert!(
        findings.is_empty(),
        "audit findings:\n{}",
        findings
            .iter()
            .map(|f| format!("[{}] {}", f.source, f.message))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Chat limits in marketing copy always equal CHAT_LIMITS[plan].
#[test]
fn test_chat_labels_match_limits() {
    for plan in PlanKey::ALL {
        let label = pricing_plan(plan).chat_label;
        let number: u32 = label
            .split_whitespace()
            .find_map(|w| w.parse().ok())
            .unwrap_or_else(|| panic!("{} chat label has no number: {}", plan, label));
        assert_eq!(number, chat_limit(plan), "chat label mismatch for {}", plan);
    }
}

/// The free plan's pricing card states its actual friend limit.
#[test]
fn test_free_friend_bullet_matches_limit() {
    let limit = friend_limit(PlanKey::Free).expect("free plan has a friend limit");
    let bullet = pricing_plan(PlanKey::Free)
        .features
        .iter()
        .find(|b| b.contains("friends"))
        .expect("free plan mentions friends");
    assert!(bullet.contains(&limit.to_string()));
}

/// Paid plans strictly grow the feature set.
#[test]
fn test_paid_plans_are_supersets_of_free() {
    // The personalization keys replace their general counterparts, so
    // check the shared-core features only.
    for feature in ["birth_chart", "cosmic_patterns", "keyword_mood_detection"] {
        for plan in [PlanKey::LunaryPlus, PlanKey::LunaryPlusAi, PlanKey::LunaryPlusAiAnnual] {
            assert!(
                features_for(plan).contains(&feature),
                "{} missing {}",
                plan,
                feature
            );
        }
    }
}

/// Every plan defined in PRICING_PLANS is a known PlanKey with copy.
#[test]
fn test_pricing_plans_cover_all_plan_keys() {
    assert_eq!(PRICING_PLANS.len(), PlanKey::ALL.len());
    for plan in PlanKey::ALL {
        assert!(PRICING_PLANS.iter().any(|p| p.id == plan));
    }
}
