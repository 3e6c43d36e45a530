// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The Grimoire: the in-app encyclopedia of astrology/tarot/crystal
//! reference material. Loaded once at startup from a JSON catalog and
//! served read-only; the social pipeline draws its source facts here.

use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Rich reference content attached to a snippet. Most fields are
/// optional; which ones are present depends on the category (zodiac
/// signs carry element/planet, tarot cards upright/reversed, and so on).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RichContent {
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub element: Option<String>,
    pub planet: Option<String>,
    pub spiritual_meaning: Option<String>,
    pub upright_meaning: Option<String>,
    pub reversed_meaning: Option<String>,
    pub metaphysical_properties: Option<String>,
    pub love_trait: Option<String>,
    pub career_trait: Option<String>,
    pub magical_uses: Vec<String>,
    pub healing_practices: Vec<String>,
    pub rituals: Vec<String>,
    pub affirmation: Option<String>,
}

/// One Grimoire entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrimoireSnippet {
    pub title: String,
    pub slug: String,
    pub category: String,
    pub summary: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub full_content: Option<RichContent>,
}

/// Read-only snippet catalog.
#[derive(Debug, Clone, Default)]
pub struct GrimoireService {
    snippets: Vec<GrimoireSnippet>,
}

impl GrimoireService {
    /// Load the catalog from a JSON file (array of snippets).
    pub fn load_from_file(path: &str) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read grimoire catalog {}: {}", path, e))?;
        let snippets: Vec<GrimoireSnippet> = serde_json::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("Failed to parse grimoire catalog {}: {}", path, e))?;
        Ok(Self { snippets })
    }

    /// Build a catalog from in-memory snippets (tests).
    pub fn with_snippets(snippets: Vec<GrimoireSnippet>) -> Self {
        Self { snippets }
    }

    pub fn snippets(&self) -> &[GrimoireSnippet] {
        &self.snippets
    }

    /// Exact slug lookup.
    pub fn by_slug(&self, slug: &str) -> Option<&GrimoireSnippet> {
        self.snippets.iter().find(|s| s.slug == slug)
    }

    /// Case-insensitive topic search over title, slug and keywords.
    /// Slug/title matches rank before keyword-only matches.
    pub fn search(&self, topic: &str, limit: usize) -> Vec<&GrimoireSnippet> {
        let needle = topic.trim().to_lowercase();
        if needle.is_empty() {
            return vec![];
        }

        let mut direct: Vec<&GrimoireSnippet> = vec![];
        let mut keyword_only: Vec<&GrimoireSnippet> = vec![];

        for snippet in &self.snippets {
            if snippet.title.to_lowercase().contains(&needle)
                || snippet.slug.to_lowercase().contains(&needle)
            {
                direct.push(snippet);
            } else if snippet
                .full_content
                .as_ref()
                .map(|fc| {
                    fc.keywords
                        .iter()
                        .any(|k| k.to_lowercase().contains(&needle))
                })
                .unwrap_or(false)
            {
                keyword_only.push(snippet);
            }
        }

        direct.extend(keyword_only);
        direct.truncate(limit);
        direct
    }
}

#[cfg(test)]
pub mod test_fixtures {
    use super::*;

    /// A zodiac snippet with enough rich content to exercise the pipeline.
    pub fn scorpio() -> GrimoireSnippet {
        GrimoireSnippet {
            title: "Scorpio".to_string(),
            slug: "zodiac/scorpio".to_string(),
            category: "zodiac".to_string(),
            summary: "Scorpio is the eighth sign of the zodiac, linked with depth and transformation.".to_string(),
            key_points: vec![
                "Water sign ruled by Pluto and Mars".to_string(),
                "Associated with intensity and renewal".to_string(),
            ],
            full_content: Some(RichContent {
                description: Some(
                    "Scorpio is a water sign often associated with emotional depth, transformation, and instinct. People with strong Scorpio placements tend to seek what lies beneath the surface.".to_string(),
                ),
                keywords: vec![
                    "transformation".to_string(),
                    "intuition".to_string(),
                    "depth".to_string(),
                ],
                element: Some("water".to_string()),
                planet: Some("Pluto".to_string()),
                spiritual_meaning: Some(
                    "Scorpio themes often point toward release and renewal.".to_string(),
                ),
                love_trait: Some(
                    "Scorpio energy tends to value loyalty and honesty.".to_string(),
                ),
                career_trait: Some(
                    "Scorpio placements often favor research and focused effort.".to_string(),
                ),
                rituals: vec!["new moon journaling".to_string(), "water scrying".to_string()],
                affirmation: Some("I release what no longer serves me.".to_string()),
                ..RichContent::default()
            }),
        }
    }

    /// A tarot snippet for variety in pipeline tests.
    pub fn the_moon() -> GrimoireSnippet {
        GrimoireSnippet {
            title: "The Moon".to_string(),
            slug: "tarot/the-moon".to_string(),
            category: "tarot".to_string(),
            summary: "The Moon is the eighteenth major arcana card, tied to intuition and the unseen.".to_string(),
            key_points: vec!["Card of intuition and uncertainty".to_string()],
            full_content: Some(RichContent {
                description: Some(
                    "The Moon tends to appear when things are not fully visible yet. It often invites patience with uncertainty.".to_string(),
                ),
                keywords: vec!["intuition".to_string(), "dreams".to_string()],
                upright_meaning: Some(
                    "The Moon often signals trusting instinct over appearances.".to_string(),
                ),
                reversed_meaning: Some(
                    "it can suggest clarity beginning to return.".to_string(),
                ),
                affirmation: Some("I can move gently through uncertainty.".to_string()),
                ..RichContent::default()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> GrimoireService {
        GrimoireService::with_snippets(vec![
            test_fixtures::scorpio(),
            test_fixtures::the_moon(),
        ])
    }

    #[test]
    fn test_by_slug() {
        let service = service();
        assert!(service.by_slug("zodiac/scorpio").is_some());
        assert!(service.by_slug("zodiac/ophiuchus").is_none());
    }

    #[test]
    fn test_search_matches_title_case_insensitively() {
        let service = service();
        let results = service.search("scorpio", 5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].slug, "zodiac/scorpio");

        let results = service.search("SCORPIO", 5);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_search_falls_back_to_keywords_and_ranks_direct_first() {
        let service = service();
        // "intuition" is a keyword on both, and in The Moon's summary only
        let results = service.search("intuition", 5);
        assert_eq!(results.len(), 2);

        // "moon" matches The Moon's title directly
        let results = service.search("moon", 1);
        assert_eq!(results[0].slug, "tarot/the-moon");
    }

    #[test]
    fn test_blank_search_returns_nothing() {
        assert!(service().search("  ", 5).is_empty());
    }
}
