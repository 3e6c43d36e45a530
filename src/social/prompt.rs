// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Prompt builder: renders a source pack plus platform/post-type rules
//! into the instruction string sent to the generation API.

use crate::social::platform::{Platform, PlatformStrategy, PostStyle};
use crate::social::post_type::PostType;
use crate::social::source_pack::SourcePack;

/// System prompt sent with every generation request.
pub const SYSTEM_PROMPT: &str = "You write social media posts that teach astrology, tarot, and \
related practice without sounding like a textbook, a motivational poster, or a horoscope app. \
You sound like someone who knows the material and has a take on it. You only use the facts \
provided; you never invent claims, and you always hedge outcome language (\"often\", \
\"tends to\", \"can\") because astrology describes tendencies, not certainties.";

/// Render the full instruction for one generation attempt.
///
/// `retry_note` carries the validator issues from a failed first
/// attempt; when present it is appended as a MUST FIX block, the same
/// way a human editor would return a draft.
pub fn build_prompt(
    pack: &SourcePack,
    platform: Platform,
    post_type: PostType,
    retry_note: Option<&str>,
) -> String {
    let strategy = platform.strategy();
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "Write one {} post about \"{}\" ({} content).\n\n",
        platform, pack.topic, pack.category
    ));

    prompt.push_str("Source facts (use only these, pick what serves the angle):\n");
    for fact in &pack.facts {
        prompt.push_str(&format!("- {}\n", fact));
    }
    if let Some(affirmation) = &pack.affirmation {
        prompt.push_str(&format!("- Affirmation: \"{}\"\n", affirmation));
    }
    if !pack.keywords.is_empty() {
        prompt.push_str(&format!("Keywords: {}\n", pack.keywords.join(", ")));
    }

    prompt.push_str(&format!("\nAngle: {}\n", post_type.instruction()));
    prompt.push_str(&format!("Tone: {}.\n", strategy.tone));
    prompt.push_str(&format_rules(&strategy));

    if let Some(note) = retry_note {
        prompt.push_str(&format!(
            "\nYour previous draft was rejected. MUST FIX before anything else:\n{}\n",
            note
        ));
    }

    prompt
}

/// Hard formatting rules for the platform.
fn format_rules(strategy: &PlatformStrategy) -> String {
    let length_rule = match strategy.style {
        PostStyle::Short => format!(
            "Keep the whole post under {} characters. One or two sentences.",
            strategy.max_chars
        ),
        PostStyle::Long => format!(
            "Stay well under {} characters. Short paragraphs separated by blank lines.",
            strategy.max_chars
        ),
    };
    let hashtag_rule = if strategy.hashtag_budget == 0 {
        "Do not use hashtags.".to_string()
    } else {
        format!(
            "Suggest at most {} lowercase hashtags, each one word.",
            strategy.hashtag_budget
        )
    };

    format!(
        "Rules:\n- {}\n- {}\n- Never mention any app or product by name.\n- No deterministic \
claims: hedge with \"often\", \"tends to\", \"can\".\n- End on a complete sentence.\n",
        length_rule, hashtag_rule
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grimoire::test_fixtures;

    fn pack() -> SourcePack {
        SourcePack::from_snippet(&test_fixtures::scorpio())
    }

    #[test]
    fn test_prompt_includes_facts_and_angle() {
        let prompt = build_prompt(&pack(), Platform::Instagram, PostType::DeepDive, None);

        assert!(prompt.contains("instagram post about \"Scorpio\""));
        assert!(prompt.contains("- Scorpio is a water sign ruled by Pluto."));
        assert!(prompt.contains(PostType::DeepDive.instruction()));
        assert!(prompt.contains("at most 3 lowercase hashtags"));
        assert!(!prompt.contains("MUST FIX"));
    }

    #[test]
    fn test_retry_note_is_appended() {
        let prompt = build_prompt(
            &pack(),
            Platform::Twitter,
            PostType::Intro,
            Some("Replace deterministic claims with hedged language"),
        );

        assert!(prompt.contains("MUST FIX"));
        assert!(prompt.contains("Replace deterministic claims"));
    }

    #[test]
    fn test_threads_prompt_forbids_hashtags() {
        let prompt = build_prompt(&pack(), Platform::Threads, PostType::Question, None);
        assert!(prompt.contains("Do not use hashtags."));
    }

    #[test]
    fn test_short_platform_gets_character_rule() {
        let prompt = build_prompt(&pack(), Platform::Twitter, PostType::QuickFact, None);
        assert!(prompt.contains("under 280 characters"));
    }
}
