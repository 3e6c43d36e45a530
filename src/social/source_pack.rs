// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Source pack assembly: the bag of facts/keywords about a topic that
//! both the prompt builder and the fallback composer draw from.

use crate::grimoire::GrimoireSnippet;

/// Facts and keywords about one topic, in priority order.
///
/// The fact list is ordered so the most broadly useful material comes
/// first; the fallback composer and the formatter both rely on being
/// able to drop facts from the end.
#[derive(Debug, Clone)]
pub struct SourcePack {
    pub topic: String,
    pub category: String,
    /// Complete sentences about the topic, highest priority first
    pub facts: Vec<String>,
    /// Bare keywords for hashtags and search phrasing
    pub keywords: Vec<String>,
    pub affirmation: Option<String>,
}

impl SourcePack {
    /// Assemble a pack from a Grimoire snippet.
    ///
    /// Fact priority follows the long-form post builder: description
    /// first, then element/planet, meanings, life-area traits, then
    /// practices and rituals.
    pub fn from_snippet(snippet: &GrimoireSnippet) -> Self {
        let mut facts: Vec<String> = vec![];
        let mut keywords: Vec<String> = vec![];
        let mut affirmation = None;

        if let Some(fc) = &snippet.full_content {
            if let Some(description) = &fc.description {
                facts.push(description.clone());
            }
            if let (Some(element), Some(planet)) = (&fc.element, &fc.planet) {
                facts.push(format!(
                    "{} is a {} sign ruled by {}.",
                    snippet.title, element, planet
                ));
            }
            if let Some(meaning) = &fc.spiritual_meaning {
                facts.push(meaning.clone());
            }
            if let Some(upright) = &fc.upright_meaning {
                facts.push(format!("When upright: {}", upright));
            }
            if let Some(reversed) = &fc.reversed_meaning {
                facts.push(format!("When reversed: {}", reversed));
            }
            if let Some(properties) = &fc.metaphysical_properties {
                facts.push(properties.clone());
            }
            if let Some(love) = &fc.love_trait {
                facts.push(format!("In love and relationships: {}", love));
            }
            if let Some(career) = &fc.career_trait {
                facts.push(format!("In career: {}", career));
            }
            if !fc.healing_practices.is_empty() {
                facts.push(format!(
                    "Healing practices: {}.",
                    join_limited(&fc.healing_practices, 4)
                ));
            }
            if !fc.magical_uses.is_empty() {
                facts.push(format!(
                    "Magical uses: {}.",
                    join_limited(&fc.magical_uses, 3)
                ));
            }
            if !fc.rituals.is_empty() {
                facts.push(format!("Rituals: {}.", join_limited(&fc.rituals, 3)));
            }

            keywords = fc.keywords.clone();
            affirmation = fc.affirmation.clone();
        }

        // Summary backs up a missing description; key points fill out
        // thin packs.
        if facts.is_empty() && !snippet.summary.is_empty() {
            facts.push(snippet.summary.clone());
        }
        if facts.len() < 2 {
            facts.extend(snippet.key_points.iter().cloned());
        }

        Self {
            topic: snippet.title.clone(),
            category: snippet.category.clone(),
            facts,
            keywords,
            affirmation,
        }
    }

    /// The single highest-priority fact, if any.
    pub fn lead_fact(&self) -> Option<&str> {
        self.facts.first().map(String::as_str)
    }
}

fn join_limited(items: &[String], limit: usize) -> String {
    items
        .iter()
        .take(limit)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grimoire::test_fixtures;

    #[test]
    fn test_description_is_lead_fact() {
        let pack = SourcePack::from_snippet(&test_fixtures::scorpio());

        assert_eq!(pack.topic, "Scorpio");
        assert!(pack.lead_fact().unwrap().starts_with("Scorpio is a water sign"));
        assert!(pack.facts.len() >= 4);
        assert_eq!(pack.keywords[0], "transformation");
        assert!(pack.affirmation.is_some());
    }

    #[test]
    fn test_element_planet_fact_is_composed() {
        let pack = SourcePack::from_snippet(&test_fixtures::scorpio());
        assert!(pack
            .facts
            .iter()
            .any(|f| f == "Scorpio is a water sign ruled by Pluto."));
    }

    #[test]
    fn test_ritual_list_is_capped() {
        let mut snippet = test_fixtures::scorpio();
        let fc = snippet.full_content.as_mut().unwrap();
        fc.rituals = (0..6).map(|i| format!("ritual {}", i)).collect();

        let pack = SourcePack::from_snippet(&snippet);
        let rituals_fact = pack.facts.iter().find(|f| f.starts_with("Rituals:")).unwrap();
        assert_eq!(rituals_fact.matches(',').count(), 2); // 3 entries
    }

    #[test]
    fn test_bare_snippet_falls_back_to_summary_and_key_points() {
        let mut snippet = test_fixtures::scorpio();
        snippet.full_content = None;

        let pack = SourcePack::from_snippet(&snippet);
        assert_eq!(pack.lead_fact().unwrap(), snippet.summary);
        assert!(pack.facts.len() > 1); // key points pulled in
    }
}
