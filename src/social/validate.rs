// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Copy validators: regex/keyword checks applied to every generated
//! draft before it ships.
//!
//! Validation philosophy: these are hard failures only. A draft that
//! trips any check is retried once with the issues as a corrective
//! note, then replaced by the deterministic fallback.

use crate::social::platform::PlatformStrategy;
use regex::Regex;
use std::sync::LazyLock;

/// The product's own brand name. It must never appear inside generated
/// educational copy; posts teach the topic, they don't pitch the app.
pub const BRAND_NAME: &str = "lunary";

/// Exact phrases that mark copy as templated filler.
pub const BANNED_PHRASES: &[&str] = &[
    "your growth awaits",
    "journey of self-discovery",
    "cosmic dance",
    "embrace your true",
    "unlock your",
    "manifest your",
    "step into your",
    "deepen your practice",
    "deepen your understanding",
    "the universe has a plan",
];

/// Templated sentence shapes caught by pattern rather than exact text.
static BANNED_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)look for .+ in the small,? repeatable details",
        r"(?i)notice what shifts when you work with .+ intentionally",
        r"(?i)patterns make sense once you start noticing them",
        r"(?i)here is the clear meaning of .+ in practice",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static banned pattern compiles"))
    .collect()
});

/// Deterministic astrological claims. Copy must hedge ("often", "tends
/// to", "can") instead of promising outcomes.
static DETERMINISTIC_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\balways\b",
        r"(?i)\bnever fails\b",
        r"(?i)\bcontrols\b",
        r"(?i)\bguarantees?\b",
        r"(?i)\bwill definitely\b",
        r"(?i)\bdestined to\b",
        r"(?i)\bmakes you\b",
        r"(?i)\byou will (?:feel|become|find)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static deterministic pattern compiles"))
    .collect()
});

/// Topics this account does not post about. A generated draft that
/// wanders here is discarded regardless of quality.
pub const OFF_DOMAIN_KEYWORDS: &[&str] = &[
    "bitcoin",
    "crypto",
    "stock market",
    "investment advice",
    "election",
    "politician",
    "diagnosis",
    "medication",
    "cure",
    "weight loss",
    "casino",
    "betting",
];

/// Whether text contains a banned phrase or banned pattern.
pub fn has_banned_phrase(text: &str) -> bool {
    let lower = text.to_lowercase();
    BANNED_PHRASES.iter().any(|p| lower.contains(p))
        || BANNED_PATTERNS.iter().any(|re| re.is_match(text))
}

/// Whether text makes deterministic astrological claims.
pub fn has_deterministic_language(text: &str) -> bool {
    DETERMINISTIC_PATTERNS.iter().any(|re| re.is_match(text))
}

/// Whether text ends like a generation that got cut off: a trailing
/// ellipsis, a dangling hyphen, no terminal punctuation, or an
/// unbalanced double quote.
pub fn has_truncation_artifact(text: &str) -> bool {
    let trimmed = text.trim_end();
    if trimmed.is_empty() {
        return true;
    }
    if trimmed.ends_with("...") || trimmed.ends_with('\u{2026}') || trimmed.ends_with('-') {
        return true;
    }
    if trimmed.chars().filter(|&c| c == '"').count() % 2 != 0 {
        return true;
    }
    // Terminal punctuation may sit inside a closing quote
    let last_meaningful = trimmed.chars().rev().find(|&c| c != '"' && c != '\'');
    !matches!(last_meaningful, Some('.') | Some('!') | Some('?'))
}

/// Whether text drifts into topics the account doesn't cover.
pub fn has_off_domain_content(text: &str) -> bool {
    let lower = text.to_lowercase();
    OFF_DOMAIN_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Whether text mentions the product brand.
pub fn mentions_brand(text: &str) -> bool {
    text.to_lowercase().contains(BRAND_NAME)
}

/// Validate a draft body + hashtags against all checks.
///
/// Returns the list of issues; empty means the draft is usable. Issue
/// strings double as the corrective note sent on retry.
pub fn validate_draft(
    body: &str,
    hashtags: &[String],
    topic: &str,
    strategy: &PlatformStrategy,
) -> Vec<String> {
    let mut issues = vec![];

    if body.trim().is_empty() {
        return vec!["Body is empty".to_string()];
    }

    if has_banned_phrase(body) {
        issues.push("Remove templated filler phrases".to_string());
    }
    if has_deterministic_language(body) {
        issues.push(
            "Replace deterministic claims with hedged language (\"often\", \"tends to\", \"can\")"
                .to_string(),
        );
    }
    if has_truncation_artifact(body) {
        issues.push("Body ends mid-thought; finish the final sentence".to_string());
    }
    if has_off_domain_content(body) {
        issues.push("Stay on astrology/spirituality topics".to_string());
    }
    if mentions_brand(body) || hashtags.iter().any(|h| mentions_brand(h)) {
        issues.push("Do not mention the product name in educational copy".to_string());
    }
    if !body.to_lowercase().contains(&topic.to_lowercase()) {
        issues.push(format!("Body must mention the topic \"{}\"", topic));
    }

    if hashtags.len() > strategy.hashtag_budget {
        issues.push(format!(
            "Use at most {} hashtags (got {})",
            strategy.hashtag_budget,
            hashtags.len()
        ));
    }
    for hashtag in hashtags {
        if !hashtag.starts_with('#')
            || hashtag.len() < 2
            || hashtag[1..].contains(|c: char| !c.is_ascii_alphanumeric())
        {
            issues.push(format!("Malformed hashtag: {}", hashtag));
            break;
        }
    }

    issues
}
