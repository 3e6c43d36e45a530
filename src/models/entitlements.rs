// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Subscription plans and the entitlement source-of-truth tables.
//!
//! Every capability gate in the API and every marketing claim audited by
//! `audit-entitlements` resolves against the tables in this module. Edit
//! here first; the audit fails the build if copy elsewhere diverges.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Subscription plan identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanKey {
    Free,
    LunaryPlus,
    LunaryPlusAi,
    LunaryPlusAiAnnual,
}

impl PlanKey {
    pub const ALL: [PlanKey; 4] = [
        PlanKey::Free,
        PlanKey::LunaryPlus,
        PlanKey::LunaryPlusAi,
        PlanKey::LunaryPlusAiAnnual,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanKey::Free => "free",
            PlanKey::LunaryPlus => "lunary_plus",
            PlanKey::LunaryPlusAi => "lunary_plus_ai",
            PlanKey::LunaryPlusAiAnnual => "lunary_plus_ai_annual",
        }
    }

    /// Whether this is a paying tier.
    pub fn is_paid(&self) -> bool {
        !matches!(self, PlanKey::Free)
    }
}

impl fmt::Display for PlanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(PlanKey::Free),
            "lunary_plus" => Ok(PlanKey::LunaryPlus),
            "lunary_plus_ai" => Ok(PlanKey::LunaryPlusAi),
            "lunary_plus_ai_annual" => Ok(PlanKey::LunaryPlusAiAnnual),
            other => Err(format!("unknown plan: {}", other)),
        }
    }
}

// ─── Feature access ──────────────────────────────────────────

const FREE_FEATURES: &[&str] = &[
    "moon_phases",
    "general_horoscope",
    "general_tarot",
    "general_crystal_recommendations",
    "grimoire",
    "lunar_calendar",
    "weekly_ai_ritual",
    "birth_chart",
    "personal_day_number",
    "personal_year_number",
    "cosmic_patterns",
    "keyword_mood_detection",
    "friend_connections_basic",
];

const PLUS_FEATURES: &[&str] = &[
    "birth_chart",
    "personalized_horoscope",
    "personal_tarot",
    "personalized_crystal_recommendations",
    "transit_calendar",
    "tarot_patterns",
    "solar_return",
    "cosmic_profile",
    "personalized_transit_readings",
    "moon_circles",
    "ritual_generator",
    "collections",
    "monthly_insights",
    "personal_day_number",
    "personal_day_meaning",
    "personal_year_number",
    "personal_year_meaning",
    "cosmic_patterns",
    "keyword_mood_detection",
    "friend_connections",
];

const AI_FEATURES: &[&str] = &[
    "birth_chart",
    "personalized_horoscope",
    "personal_tarot",
    "personalized_crystal_recommendations",
    "transit_calendar",
    "tarot_patterns",
    "solar_return",
    "cosmic_profile",
    "personalized_transit_readings",
    "moon_circles",
    "ritual_generator",
    "collections",
    "monthly_insights",
    "personal_day_number",
    "personal_day_meaning",
    "personal_year_number",
    "personal_year_meaning",
    "cosmic_patterns",
    "advanced_cosmic_patterns",
    "keyword_mood_detection",
    "ai_mood_detection",
    "unlimited_ai_chat",
    "deeper_readings",
    "weekly_reports",
    "saved_chat_threads",
    "downloadable_reports",
    "ai_ritual_generation",
    "advanced_patterns",
    "friend_connections",
    "relationship_timing",
    "shared_cosmic_events",
];

const AI_ANNUAL_FEATURES: &[&str] = &[
    "birth_chart",
    "personalized_horoscope",
    "personal_tarot",
    "personalized_crystal_recommendations",
    "transit_calendar",
    "tarot_patterns",
    "solar_return",
    "cosmic_profile",
    "personalized_transit_readings",
    "moon_circles",
    "ritual_generator",
    "collections",
    "monthly_insights",
    "personal_day_number",
    "personal_day_meaning",
    "personal_year_number",
    "personal_year_meaning",
    "cosmic_patterns",
    "advanced_cosmic_patterns",
    "keyword_mood_detection",
    "ai_mood_detection",
    "unlimited_ai_chat",
    "deeper_readings",
    "weekly_reports",
    "saved_chat_threads",
    "downloadable_reports",
    "ai_ritual_generation",
    "advanced_patterns",
    "unlimited_tarot_spreads",
    "yearly_forecast",
    "data_export",
    "friend_connections",
    "relationship_timing",
    "shared_cosmic_events",
];

/// Feature keys granted to a plan.
pub fn features_for(plan: PlanKey) -> &'static [&'static str] {
    match plan {
        PlanKey::Free => FREE_FEATURES,
        PlanKey::LunaryPlus => PLUS_FEATURES,
        PlanKey::LunaryPlusAi => AI_FEATURES,
        PlanKey::LunaryPlusAiAnnual => AI_ANNUAL_FEATURES,
    }
}

/// Whether a plan grants a feature key.
pub fn plan_allows(plan: PlanKey, feature: &str) -> bool {
    features_for(plan).contains(&feature)
}

// ─── Limits ──────────────────────────────────────────────────

/// Daily Astral Guide chat / generation message limits per plan.
pub fn chat_limit(plan: PlanKey) -> u32 {
    match plan {
        PlanKey::Free => 3,
        PlanKey::LunaryPlus => 50,
        PlanKey::LunaryPlusAi | PlanKey::LunaryPlusAiAnnual => 300,
    }
}

/// Friend connection limit per plan. `None` means unlimited.
pub fn friend_limit(plan: PlanKey) -> Option<u32> {
    if plan.is_paid() {
        None
    } else {
        Some(5)
    }
}

/// Free trial length in days when subscribing to a plan.
pub fn trial_days(plan: PlanKey) -> u32 {
    match plan {
        PlanKey::Free => 0,
        PlanKey::LunaryPlus | PlanKey::LunaryPlusAi => 7,
        PlanKey::LunaryPlusAiAnnual => 14,
    }
}

// ─── Pricing plans (marketing source of truth) ───────────────

/// A marketing pricing plan as shown on the pricing page.
#[derive(Debug, Clone)]
pub struct PricingPlan {
    pub id: PlanKey,
    pub name: &'static str,
    pub description: &'static str,
    /// Price in whole currency units per interval
    pub price: f64,
    pub interval: &'static str,
    /// Copy shown next to the chat limit, containing the literal number
    pub chat_label: &'static str,
    /// Feature bullets as rendered on the pricing page
    pub features: &'static [&'static str],
}

pub static PRICING_PLANS: &[PricingPlan] = &[
    PricingPlan {
        id: PlanKey::Free,
        name: "Cosmic Explorer",
        description: "Perfect for exploring astrology",
        price: 0.0,
        interval: "month",
        chat_label: "3 Astral Guide chats per day",
        features: &[
            "Your personal birth chart",
            "Daily moon phases & insights",
            "General tarot card of the day",
            "Basic lunar calendar",
            "General daily horoscope",
            "Access to grimoire knowledge",
            "Personal Day number (number only)",
            "Personal Year number (number only)",
            "Cosmic Circle: add up to 5 friends",
        ],
    },
    PricingPlan {
        id: PlanKey::LunaryPlus,
        name: "Lunary+",
        description: "For building a consistent practice",
        price: 4.99,
        interval: "month",
        chat_label: "50 Astral Guide chats per day",
        features: &[
            "Everything in Cosmic Explorer",
            "Complete birth chart analysis",
            "Personalized daily horoscopes",
            "Personal transit impacts",
            "Solar Return & birthday insights",
            "Moon Circles (New & Full Moon)",
            "Personal tarot card & guidance",
            "Personalized crystal recommendations",
            "Monthly cosmic insights",
            "Personal Day & Personal Year interpretations",
            "Tarot pattern analysis",
            "Collections (no limit)",
            "Cosmic Circle: unlimited friends",
        ],
    },
    PricingPlan {
        id: PlanKey::LunaryPlusAi,
        name: "Lunary+ Pro",
        description: "For serious students & practitioners",
        price: 8.99,
        interval: "month",
        chat_label: "300 Astral Guide chats per day",
        features: &[
            "Everything in Lunary+",
            "Personalized weekly reports",
            "Astral Guide ritual generation",
            "Deeper tarot interpretations",
            "Advanced pattern analysis",
            "Advanced cosmic pattern detection",
            "Enhanced mood detection",
            "Downloadable PDF reports",
            "Saved chat threads",
            "Best Times to Connect",
            "Shared Cosmic Events",
        ],
    },
    PricingPlan {
        id: PlanKey::LunaryPlusAiAnnual,
        name: "Lunary+ Pro Annual",
        description: "For serious students & practitioners",
        price: 89.99,
        interval: "year",
        chat_label: "300 Astral Guide chats per day",
        features: &[
            "Everything in Lunary+ Pro",
            "Unlimited tarot spreads",
            "Yearly cosmic forecast",
            "Data export",
            "Priority customer support",
        ],
    },
];

/// Look up the pricing plan for a plan key.
pub fn pricing_plan(plan: PlanKey) -> &'static PricingPlan {
    PRICING_PLANS
        .iter()
        .find(|p| p.id == plan)
        .expect("every PlanKey has a pricing plan")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_key_round_trip() {
        for plan in PlanKey::ALL {
            assert_eq!(plan.as_str().parse::<PlanKey>().unwrap(), plan);
        }
    }

    #[test]
    fn test_free_plan_excludes_personalization() {
        assert!(plan_allows(PlanKey::Free, "general_horoscope"));
        assert!(!plan_allows(PlanKey::Free, "personalized_horoscope"));
        assert!(plan_allows(PlanKey::LunaryPlus, "personalized_horoscope"));
    }

    #[test]
    fn test_ai_tiers_share_chat_limit() {
        assert_eq!(chat_limit(PlanKey::LunaryPlusAi), 300);
        assert_eq!(
            chat_limit(PlanKey::LunaryPlusAi),
            chat_limit(PlanKey::LunaryPlusAiAnnual)
        );
        assert_eq!(chat_limit(PlanKey::Free), 3);
    }

    #[test]
    fn test_friend_limits() {
        assert_eq!(friend_limit(PlanKey::Free), Some(5));
        assert_eq!(friend_limit(PlanKey::LunaryPlus), None);
        assert_eq!(friend_limit(PlanKey::LunaryPlusAiAnnual), None);
    }

    #[test]
    fn test_every_plan_has_pricing_copy() {
        for plan in PlanKey::ALL {
            let pricing = pricing_plan(plan);
            assert!(!pricing.features.is_empty());
            assert!(!pricing.chat_label.is_empty());
        }
    }

    #[test]
    fn test_annual_is_superset_of_monthly_ai() {
        for feature in features_for(PlanKey::LunaryPlusAi) {
            assert!(
                plan_allows(PlanKey::LunaryPlusAiAnnual, feature),
                "annual plan missing {}",
                feature
            );
        }
    }
}
