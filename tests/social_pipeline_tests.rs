// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end properties of the social copy pipeline, exercised through
//! the deterministic fallback path (the path that must never fail).

use lunary_api::grimoire::GrimoireService;
use lunary_api::social::fallback::compose_fallback;
use lunary_api::social::format::fit_to_budget;
use lunary_api::social::validate::{
    has_banned_phrase, has_deterministic_language, mentions_brand, validate_draft,
};
use lunary_api::social::{Platform, PostType, SourcePack};

fn catalog() -> GrimoireService {
    GrimoireService::load_from_file("data/grimoire.json").expect("grimoire catalog loads")
}

#[test]
fn test_catalog_has_rich_content() {
    let catalog = catalog();
    assert!(catalog.snippets().len() >= 6);
    for snippet in catalog.snippets() {
        assert!(!snippet.summary.is_empty(), "{} has no summary", snippet.slug);
        assert!(
            snippet.full_content.is_some(),
            "{} has no rich content",
            snippet.slug
        );
    }
}

/// Formatted copy never exceeds the platform budget, for any catalog
/// topic on any platform.
#[test]
fn test_formatted_copy_fits_every_platform_budget() {
    let catalog = catalog();

    for snippet in catalog.snippets() {
        let pack = SourcePack::from_snippet(snippet);
        for platform in Platform::ALL {
            let strategy = platform.strategy();
            let draft = compose_fallback(&pack, PostType::DeepDive, &strategy);
            let post = fit_to_budget(&draft.body, &draft.hashtags, &strategy);

            assert!(
                post.rendered().chars().count() <= strategy.max_chars,
                "{} on {} is over budget",
                snippet.slug,
                platform
            );
            assert!(post.hashtags.len() <= strategy.hashtag_budget);
        }
    }
}

/// After the fallback path, copy contains no banned phrase, no
/// deterministic language, and no brand mention.
#[test]
fn test_fallback_copy_is_always_clean() {
    let catalog = catalog();

    for snippet in catalog.snippets() {
        let pack = SourcePack::from_snippet(snippet);
        for post_type in PostType::ALL {
            let strategy = Platform::Instagram.strategy();
            let draft = compose_fallback(&pack, post_type, &strategy);

            assert!(
                !has_banned_phrase(&draft.body),
                "{} {:?} contains a banned phrase: {}",
                snippet.slug,
                post_type,
                draft.body
            );
            assert!(
                !has_deterministic_language(&draft.body),
                "{} {:?} contains deterministic language: {}",
                snippet.slug,
                post_type,
                draft.body
            );
            assert!(!mentions_brand(&draft.body));

            let issues = validate_draft(&draft.body, &draft.hashtags, &pack.topic, &strategy);
            assert!(
                issues.is_empty(),
                "{} {:?} failed validation: {:?}",
                snippet.slug,
                post_type,
                issues
            );
        }
    }
}

/// Threads gets no hashtags; Twitter gets at most two.
#[test]
fn test_hashtag_budgets_per_platform() {
    let catalog = catalog();
    let snippet = catalog.by_slug("zodiac/scorpio").unwrap();
    let pack = SourcePack::from_snippet(snippet);

    let threads = compose_fallback(&pack, PostType::Intro, &Platform::Threads.strategy());
    assert!(threads.hashtags.is_empty());

    let twitter = compose_fallback(&pack, PostType::Intro, &Platform::Twitter.strategy());
    assert!(twitter.hashtags.len() <= 2);
}

/// Short-style fallbacks fit Twitter even before formatting trims them.
#[test]
fn test_quick_fact_is_genuinely_short() {
    let catalog = catalog();
    let snippet = catalog.by_slug("tarot/the-moon").unwrap();
    let pack = SourcePack::from_snippet(snippet);

    let strategy = Platform::Twitter.strategy();
    let draft = compose_fallback(&pack, PostType::QuickFact, &strategy);
    let post = fit_to_budget(&draft.body, &draft.hashtags, &strategy);

    assert!(post.rendered().chars().count() <= strategy.max_chars);
    assert!(post.body.contains("The Moon"));
}
