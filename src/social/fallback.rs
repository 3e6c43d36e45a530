// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Deterministic fallback composer.
//!
//! When the generation API fails validation twice (or fails outright),
//! the pipeline must still produce usable copy. These templates are
//! assembled from the same source pack the prompt used. Invariant: a
//! fallback draft passes every validator before formatting, so the
//! pipeline never has an unrecoverable error path.

use crate::social::platform::{PlatformStrategy, PostStyle};
use crate::social::post_type::PostType;
use crate::social::source_pack::SourcePack;

/// A draft produced by the fallback composer (pre-formatting).
#[derive(Debug, Clone)]
pub struct FallbackDraft {
    pub body: String,
    pub hashtags: Vec<String>,
}

/// Compose deterministic copy for a post type from the source pack.
pub fn compose_fallback(
    pack: &SourcePack,
    post_type: PostType,
    strategy: &PlatformStrategy,
) -> FallbackDraft {
    let lead = pack
        .lead_fact()
        .map(str::to_string)
        .unwrap_or_else(|| format!("{} is part of the grimoire's core material.", pack.topic));

    let body = match post_type {
        PostType::Intro => with_topic(pack, &join_facts(pack, &lead, strategy, 2)),
        PostType::DeepDive => with_topic(
            pack,
            &join_facts(pack, &lead, strategy, if strategy.style == PostStyle::Long { 5 } else { 2 }),
        ),
        PostType::Question => format!(
            "{} Where do {} themes tend to show up for you?",
            with_topic(pack, &lead),
            pack.topic
        ),
        PostType::Ritual => match ritual_fact(pack) {
            Some(ritual) => format!(
                "A small practice for working with {}: try {}",
                pack.topic, ritual
            ),
            None => format!(
                "{} Sitting with one of these ideas for a few minutes can be practice enough.",
                with_topic(pack, &lead)
            ),
        },
        PostType::Persona => format!(
            "If {} shows up strongly for you, some of this may feel familiar: {}",
            pack.topic,
            lowercase_first(&lead)
        ),
        PostType::VideoCaption => format!(
            "{}, explained in under a minute. {}",
            pack.topic,
            join_facts(pack, &lead, strategy, 2)
        ),
        PostType::MythBust => format!(
            "{} often gets reduced to a single trait. The fuller picture: {}",
            pack.topic,
            lowercase_first(&lead)
        ),
        PostType::Seasonal => format!(
            "{} themes tend to surface around this point in the year. {}",
            pack.topic, lead
        ),
        PostType::Affirmation => match &pack.affirmation {
            Some(affirmation) => format!(
                "An affirmation often paired with {}: \"{}\"",
                pack.topic, affirmation
            ),
            None => with_topic(pack, &lead),
        },
        PostType::QuickFact => with_topic(pack, &lead),
    };

    FallbackDraft {
        body,
        hashtags: suggested_hashtags(pack, strategy.hashtag_budget),
    }
}

/// Build up to `budget` hashtags: domain tag for the category, topic
/// tag from the title, then a category-flavored third.
pub fn suggested_hashtags(pack: &SourcePack, budget: usize) -> Vec<String> {
    let domain = match pack.category.as_str() {
        "zodiac" | "planetary" => "#astrology",
        "tarot" => "#tarot",
        "crystals" => "#crystalhealing",
        "numerology" => "#numerology",
        "chakras" => "#chakras",
        "season" => "#wheeloftheyear",
        _ => "#spirituality",
    };

    let topic_base: String = pack
        .topic
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();

    let third = match pack.category.as_str() {
        "zodiac" => "#zodiacsigns",
        "tarot" => "#tarotreading",
        "crystals" => "#healingstones",
        "numerology" => "#numbersymbolism",
        "chakras" => "#energyhealing",
        "season" => "#seasonalrituals",
        _ => "#cosmicwisdom",
    };

    let mut tags = vec![domain.to_string()];
    if !topic_base.is_empty() {
        let topic_tag = format!("#{}", topic_base);
        if !tags.contains(&topic_tag) {
            tags.push(topic_tag);
        }
    }
    if !tags.contains(&third.to_string()) {
        tags.push(third.to_string());
    }
    tags.truncate(budget);
    tags
}

/// Join the first facts into one body, sized to the platform style.
fn join_facts(pack: &SourcePack, lead: &str, strategy: &PlatformStrategy, max_facts: usize) -> String {
    let separator = if strategy.style == PostStyle::Long {
        "\n\n"
    } else {
        " "
    };
    let mut facts: Vec<&str> = pack.facts.iter().map(String::as_str).collect();
    if facts.is_empty() {
        facts.push(lead);
    }
    facts.truncate(max_facts);
    facts.join(separator)
}

/// The practice list from the pack, without its label prefix.
fn ritual_fact(pack: &SourcePack) -> Option<String> {
    for prefix in ["Rituals: ", "Healing practices: "] {
        if let Some(fact) = pack.facts.iter().find(|f| f.starts_with(prefix)) {
            return Some(lowercase_first(&fact[prefix.len()..]));
        }
    }
    None
}

/// Prefix the topic if the text doesn't already mention it.
fn with_topic(pack: &SourcePack, text: &str) -> String {
    if text.to_lowercase().contains(&pack.topic.to_lowercase()) {
        text.to_string()
    } else {
        format!("{}: {}", pack.topic, lowercase_first(text))
    }
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grimoire::test_fixtures;
    use crate::social::platform::Platform;
    use crate::social::validate::validate_draft;

    #[test]
    fn test_every_post_type_passes_validation() {
        let pack = SourcePack::from_snippet(&test_fixtures::scorpio());
        let strategy = Platform::Instagram.strategy();

        for post_type in PostType::ALL {
            let draft = compose_fallback(&pack, post_type, &strategy);
            let issues = validate_draft(&draft.body, &draft.hashtags, &pack.topic, &strategy);
            assert!(
                issues.is_empty(),
                "{:?} fallback failed validation: {:?}\nbody: {}",
                post_type,
                issues,
                draft.body
            );
        }
    }

    #[test]
    fn test_short_style_joins_inline() {
        let pack = SourcePack::from_snippet(&test_fixtures::scorpio());
        let draft = compose_fallback(&pack, PostType::Intro, &Platform::Twitter.strategy());
        assert!(!draft.body.contains('\n'));
    }

    #[test]
    fn test_ritual_uses_ritual_fact() {
        let pack = SourcePack::from_snippet(&test_fixtures::scorpio());
        let draft = compose_fallback(&pack, PostType::Ritual, &Platform::Instagram.strategy());
        assert!(draft.body.contains("Rituals:") || draft.body.contains("practice"));
        assert!(draft.body.contains("Scorpio"));
    }

    #[test]
    fn test_affirmation_quotes_the_affirmation() {
        let pack = SourcePack::from_snippet(&test_fixtures::scorpio());
        let draft = compose_fallback(&pack, PostType::Affirmation, &Platform::Instagram.strategy());
        assert!(draft.body.contains("\"I release what no longer serves me.\""));
    }

    #[test]
    fn test_hashtags_respect_budget_and_domain() {
        let pack = SourcePack::from_snippet(&test_fixtures::scorpio());

        let tags = suggested_hashtags(&pack, 3);
        assert_eq!(tags, vec!["#astrology", "#scorpio", "#zodiacsigns"]);

        let tags = suggested_hashtags(&pack, 2);
        assert_eq!(tags.len(), 2);

        let tags = suggested_hashtags(&pack, 0);
        assert!(tags.is_empty());
    }

    #[test]
    fn test_tarot_pack_gets_tarot_tags() {
        let pack = SourcePack::from_snippet(&test_fixtures::the_moon());
        let tags = suggested_hashtags(&pack, 3);
        assert_eq!(tags, vec!["#tarot", "#themoon", "#tarotreading"]);
    }
}
