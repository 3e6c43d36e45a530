// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Entitlements audit: cross-checks marketing copy against the
//! entitlement tables.
//!
//! Any divergence is a hard build failure (the `audit-entitlements`
//! binary exits non-zero), never a warning. The claim tables below
//! mirror the marketing surfaces that mention features or limits; when
//! copy changes, the matching claim must change with it.

use crate::models::entitlements::{
    chat_limit, features_for, friend_limit, pricing_plan, PlanKey,
};
use regex::Regex;
use std::sync::LazyLock;

/// Pricing bullets that intentionally don't map to a feature key.
const PRICING_FEATURE_IGNORES: &[&str] = &[
    "Everything in Cosmic Explorer",
    "Everything in Lunary+",
    "Everything in Lunary+ Pro",
];

/// One marketing claim and the feature keys that back it.
#[derive(Debug, Clone, Copy)]
pub struct ClaimRule {
    /// The literal copy text
    pub text: &'static str,
    /// Feature keys the claim asserts; empty only when
    /// `requires_entitlement` is false
    pub features: &'static [&'static str],
    /// Explicitly marked as not entitlement-gated (limits, support, etc.)
    pub requires_entitlement: bool,
}

const fn claim(text: &'static str, features: &'static [&'static str]) -> ClaimRule {
    ClaimRule {
        text,
        features,
        requires_entitlement: true,
    }
}

const fn ungated(text: &'static str) -> ClaimRule {
    ClaimRule {
        text,
        features: &[],
        requires_entitlement: false,
    }
}

/// A marketing surface and the claims it makes for one plan.
pub struct ClaimSource {
    /// Where the copy lives (frontend path, kept for error messages)
    pub source: &'static str,
    pub plan: PlanKey,
    pub claims: &'static [ClaimRule],
}

/// Claims backing each pricing-page feature bullet, per plan.
static PRICING_FEATURE_CLAIMS: &[ClaimSource] = &[
    ClaimSource {
        source: "pricing page (free)",
        plan: PlanKey::Free,
        claims: &[
            claim("Your personal birth chart", &["birth_chart"]),
            claim("Daily moon phases & insights", &["moon_phases"]),
            claim("General tarot card of the day", &["general_tarot"]),
            claim("Basic lunar calendar", &["lunar_calendar"]),
            claim("General daily horoscope", &["general_horoscope"]),
            claim("Access to grimoire knowledge", &["grimoire"]),
            claim("Personal Day number (number only)", &["personal_day_number"]),
            claim("Personal Year number (number only)", &["personal_year_number"]),
            claim("Cosmic Circle: add up to 5 friends", &["friend_connections_basic"]),
        ],
    },
    ClaimSource {
        source: "pricing page (lunary_plus)",
        plan: PlanKey::LunaryPlus,
        claims: &[
            claim("Complete birth chart analysis", &["birth_chart"]),
            claim("Personalized daily horoscopes", &["personalized_horoscope"]),
            claim("Personal transit impacts", &["personalized_transit_readings"]),
            claim("Solar Return & birthday insights", &["solar_return"]),
            claim("Moon Circles (New & Full Moon)", &["moon_circles"]),
            claim("Personal tarot card & guidance", &["personal_tarot"]),
            claim(
                "Personalized crystal recommendations",
                &["personalized_crystal_recommendations"],
            ),
            claim("Monthly cosmic insights", &["monthly_insights"]),
            claim(
                "Personal Day & Personal Year interpretations",
                &["personal_day_meaning", "personal_year_meaning"],
            ),
            claim("Tarot pattern analysis", &["tarot_patterns"]),
            claim("Collections (no limit)", &["collections"]),
            claim("Cosmic Circle: unlimited friends", &["friend_connections"]),
        ],
    },
    ClaimSource {
        source: "pricing page (lunary_plus_ai)",
        plan: PlanKey::LunaryPlusAi,
        claims: &[
            claim("Personalized weekly reports", &["weekly_reports"]),
            claim("Astral Guide ritual generation", &["ai_ritual_generation"]),
            claim("Deeper tarot interpretations", &["deeper_readings"]),
            claim("Advanced pattern analysis", &["advanced_patterns"]),
            claim("Advanced cosmic pattern detection", &["advanced_cosmic_patterns"]),
            claim("Enhanced mood detection", &["ai_mood_detection"]),
            claim("Downloadable PDF reports", &["downloadable_reports"]),
            claim("Saved chat threads", &["saved_chat_threads"]),
            claim("Best Times to Connect", &["relationship_timing"]),
            claim("Shared Cosmic Events", &["shared_cosmic_events"]),
        ],
    },
    ClaimSource {
        source: "pricing page (lunary_plus_ai_annual)",
        plan: PlanKey::LunaryPlusAiAnnual,
        claims: &[
            claim("Unlimited tarot spreads", &["unlimited_tarot_spreads"]),
            claim("Yearly cosmic forecast", &["yearly_forecast"]),
            claim("Data export", &["data_export"]),
            ungated("Priority customer support"),
        ],
    },
];

/// Claims made by copy outside the pricing page.
static COPY_CLAIM_SOURCES: &[ClaimSource] = &[ClaimSource {
    source: "src/components/OnboardingFeatureTour.tsx",
    plan: PlanKey::Free,
    claims: &[
        claim(
            "Your personal birth chart overview and key placements",
            &["birth_chart"],
        ),
        claim(
            "Daily moon phase insights + general horoscope",
            &["moon_phases", "general_horoscope"],
        ),
        claim(
            "Tarot card of the day + basic lunar calendar",
            &["general_tarot", "lunar_calendar"],
        ),
        claim(
            "Grimoire library for astrology, tarot, and rituals",
            &["grimoire"],
        ),
        claim("Weekly AI ritual to get started", &["weekly_ai_ritual"]),
    ],
}];

/// Copy that mentions the daily chat limit, outside pricing chat labels.
static CHAT_LIMIT_COPY: &[(&str, PlanKey, &str)] = &[(
    "src/components/OnboardingFlow.tsx",
    PlanKey::Free,
    "Includes 3 Astral Guide chats per day to get you started",
)];

/// One audit failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditFinding {
    pub source: String,
    pub plan: PlanKey,
    pub message: String,
}

static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)").expect("static number regex compiles"));

/// Run the complete audit. An empty result means copy and entitlement
/// tables agree.
pub fn run_audit() -> Vec<AuditFinding> {
    let mut findings = vec![];

    for source in PRICING_FEATURE_CLAIMS {
        // Every claimed feature must exist in the plan's entitlements
        for rule in source.claims {
            if let Some(message) = check_claim(source.plan, rule) {
                findings.push(AuditFinding {
                    source: source.source.to_string(),
                    plan: source.plan,
                    message,
                });
            }
        }

        // Every pricing bullet must be covered by a claim or ignore
        let pricing = pricing_plan(source.plan);
        for bullet in pricing.features {
            let covered = PRICING_FEATURE_IGNORES.contains(bullet)
                || source.claims.iter().any(|c| c.text == *bullet);
            if !covered {
                findings.push(AuditFinding {
                    source: source.source.to_string(),
                    plan: source.plan,
                    message: format!("Unaudited pricing bullet: \"{}\"", bullet),
                });
            }
        }

        // And no claim may be stale (copy that no longer exists)
        for rule in source.claims {
            if !pricing.features.contains(&rule.text) {
                findings.push(AuditFinding {
                    source: source.source.to_string(),
                    plan: source.plan,
                    message: format!("Stale claim, bullet no longer in copy: \"{}\"", rule.text),
                });
            }
        }
    }

    for source in COPY_CLAIM_SOURCES {
        for rule in source.claims {
            if let Some(message) = check_claim(source.plan, rule) {
                findings.push(AuditFinding {
                    source: source.source.to_string(),
                    plan: source.plan,
                    message,
                });
            }
        }
    }

    // Chat limits: pricing labels plus other copy mentioning a number
    for plan in PlanKey::ALL {
        let label = pricing_plan(plan).chat_label;
        if let Some(message) = check_chat_copy(plan, label) {
            findings.push(AuditFinding {
                source: format!("pricing page ({})", plan),
                plan,
                message,
            });
        }
    }
    for (source, plan, copy) in CHAT_LIMIT_COPY {
        if let Some(message) = check_chat_copy(*plan, copy) {
            findings.push(AuditFinding {
                source: source.to_string(),
                plan: *plan,
                message,
            });
        }
    }

    // Friend limit copy on the free pricing card
    if let Some(message) = check_friend_copy(PlanKey::Free) {
        findings.push(AuditFinding {
            source: "pricing page (free)".to_string(),
            plan: PlanKey::Free,
            message,
        });
    }

    findings
}

/// Verify one claim's feature keys against the plan's entitlements.
fn check_claim(plan: PlanKey, rule: &ClaimRule) -> Option<String> {
    if !rule.requires_entitlement {
        return None;
    }
    if rule.features.is_empty() {
        return Some(format!(
            "Claim \"{}\" requires entitlement but maps to no feature",
            rule.text
        ));
    }
    let plan_features = features_for(plan);
    for feature in rule.features {
        if !plan_features.contains(feature) {
            return Some(format!(
                "Claim \"{}\" maps to \"{}\" which plan {} does not grant",
                rule.text, feature, plan
            ));
        }
    }
    None
}

/// Verify copy that mentions a daily chat count against CHAT_LIMITS.
fn check_chat_copy(plan: PlanKey, copy: &str) -> Option<String> {
    let expected = chat_limit(plan);
    match FIRST_NUMBER
        .captures(copy)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
    {
        Some(found) if found == expected => None,
        Some(found) => Some(format!(
            "Chat limit copy says {} but CHAT_LIMITS[{}] is {}: \"{}\"",
            found, plan, expected, copy
        )),
        None => Some(format!("Chat limit copy has no number: \"{}\"", copy)),
    }
}

/// Verify the free plan's friend-count bullet against FRIEND_LIMITS.
fn check_friend_copy(plan: PlanKey) -> Option<String> {
    let expected = friend_limit(plan)?;
    let bullet = pricing_plan(plan)
        .features
        .iter()
        .find(|b| b.contains("friends"))?;
    match FIRST_NUMBER
        .captures(bullet)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
    {
        Some(found) if found == expected => None,
        Some(found) => Some(format!(
            "Friend limit copy says {} but the limit is {}: \"{}\"",
            found, expected, bullet
        )),
        None => Some(format!("Friend limit copy has no number: \"{}\"", bullet)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_passes_on_current_tables() {
        let findings = run_audit();
        assert!(
            findings.is_empty(),
            "entitlement audit failed:\n{}",
            findings
                .iter()
                .map(|f| format!("[{}] {}", f.source, f.message))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    #[test]
    fn test_check_claim_catches_unknown_feature() {
        let rule = claim("Daily weather horoscope", &["weather_horoscope"]);
        let message = check_claim(PlanKey::Free, &rule).unwrap();
        assert!(message.contains("weather_horoscope"));
    }

    #[test]
    fn test_check_claim_rejects_featureless_gated_claim() {
        let rule = claim("Mystery feature", &[]);
        assert!(check_claim(PlanKey::Free, &rule).is_some());
        assert!(check_claim(PlanKey::Free, &ungated("Priority support")).is_none());
    }

    #[test]
    fn test_check_chat_copy_catches_wrong_number() {
        assert!(check_chat_copy(PlanKey::Free, "3 chats per day").is_none());
        let message = check_chat_copy(PlanKey::Free, "10 chats per day").unwrap();
        assert!(message.contains("10"));
        assert!(message.contains('3'));
        assert!(check_chat_copy(PlanKey::Free, "unlimited chats").is_some());
    }

    #[test]
    fn test_friend_copy_matches_limit() {
        assert!(check_friend_copy(PlanKey::Free).is_none());
        // Paid plans have no numeric friend limit to check
        assert!(check_friend_copy(PlanKey::LunaryPlus).is_none());
    }
}
