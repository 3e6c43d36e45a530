// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Final formatting: fit body text and hashtags into the platform's
//! character budget without introducing truncation artifacts.

use crate::social::platform::PlatformStrategy;
use crate::social::SocialPost;

/// Fit a draft into the platform budget.
///
/// Order of sacrifice: duplicate hashtags, over-budget hashtags, excess
/// hashtags that don't fit, then whole sentences from the end of the
/// body. The body always keeps at least one sentence.
pub fn fit_to_budget(body: &str, hashtags: &[String], strategy: &PlatformStrategy) -> SocialPost {
    let mut tags = normalize_hashtags(hashtags, strategy.hashtag_budget);
    let body = body.trim().to_string();

    // Drop hashtags (from the end) until the post fits or none remain
    while !tags.is_empty() && rendered_len(&body, &tags) > strategy.max_chars {
        tags.pop();
    }

    let body = if rendered_len(&body, &tags) > strategy.max_chars {
        truncate_at_sentence(&body, strategy.max_chars)
    } else {
        body
    };

    SocialPost {
        body,
        hashtags: tags,
    }
}

/// Dedupe (case-insensitive), lowercase, and cap hashtags.
fn normalize_hashtags(hashtags: &[String], budget: usize) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut tags = vec![];
    for raw in hashtags {
        let tag = raw.trim().to_lowercase();
        if tag.len() < 2 || !tag.starts_with('#') {
            continue;
        }
        if seen.insert(tag.clone()) {
            tags.push(tag);
        }
        if tags.len() == budget {
            break;
        }
    }
    tags
}

/// Rendered length in characters: body, blank line, space-joined tags.
fn rendered_len(body: &str, tags: &[String]) -> usize {
    let mut len = body.chars().count();
    if !tags.is_empty() {
        len += 2; // "\n\n"
        len += tags.iter().map(|t| t.chars().count()).sum::<usize>();
        len += tags.len() - 1; // joining spaces
    }
    len
}

/// Truncate text to `max_chars` by dropping whole sentences from the
/// end. If even the first sentence is too long, cut at a word boundary
/// and close with a period so the result still scans as a sentence.
fn truncate_at_sentence(text: &str, max_chars: usize) -> String {
    let sentences = split_sentences(text);
    let mut kept = String::new();

    for sentence in &sentences {
        let candidate_len =
            kept.chars().count() + sentence.chars().count() + if kept.is_empty() { 0 } else { 1 };
        if candidate_len > max_chars {
            break;
        }
        if !kept.is_empty() {
            kept.push(' ');
        }
        kept.push_str(sentence);
    }

    if !kept.is_empty() {
        return kept;
    }

    // Single over-long sentence: cut at a word boundary, leaving room
    // for the closing period.
    let mut cut = String::new();
    for word in text.split_whitespace() {
        let candidate_len =
            cut.chars().count() + word.chars().count() + if cut.is_empty() { 0 } else { 1 } + 1;
        if candidate_len > max_chars {
            break;
        }
        if !cut.is_empty() {
            cut.push(' ');
        }
        cut.push_str(word);
    }
    let mut cut = cut.trim_end_matches([',', ';', ':']).to_string();
    if !cut.ends_with(['.', '!', '?']) {
        cut.push('.');
    }
    cut
}

/// Split text into sentences, keeping terminal punctuation attached.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = vec![];
    let mut current = String::new();

    for c in text.chars() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                sentences.push(trimmed.to_string());
            }
            current.clear();
        }
    }
    let trailing = current.trim();
    if !trailing.is_empty() {
        sentences.push(trailing.to_string());
    }
    sentences
}
