//! Post types: the editorial angle a generated post takes.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The editorial angle for a generated post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostType {
    /// First introduction to a topic
    Intro,
    /// Longer exploration of one facet
    DeepDive,
    /// Open question to prompt replies
    Question,
    /// A small practice the reader can try
    Ritual,
    /// "If this is your placement..." framing
    Persona,
    /// Caption for a short-form video
    VideoCaption,
    /// Correct a common misconception
    MythBust,
    /// Tie the topic to the current season or sabbat
    Seasonal,
    /// Lead with the topic's affirmation
    Affirmation,
    /// One concrete fact, stated plainly
    QuickFact,
}

impl PostType {
    pub const ALL: [PostType; 10] = [
        PostType::Intro,
        PostType::DeepDive,
        PostType::Question,
        PostType::Ritual,
        PostType::Persona,
        PostType::VideoCaption,
        PostType::MythBust,
        PostType::Seasonal,
        PostType::Affirmation,
        PostType::QuickFact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Intro => "intro",
            PostType::DeepDive => "deep_dive",
            PostType::Question => "question",
            PostType::Ritual => "ritual",
            PostType::Persona => "persona",
            PostType::VideoCaption => "video_caption",
            PostType::MythBust => "myth_bust",
            PostType::Seasonal => "seasonal",
            PostType::Affirmation => "affirmation",
            PostType::QuickFact => "quick_fact",
        }
    }

    /// Instruction text rendered into the prompt for this angle.
    pub fn instruction(&self) -> &'static str {
        match self {
            PostType::Intro => {
                "Introduce the topic to someone who has never heard of it. Lead with the most interesting concrete fact, not a definition."
            }
            PostType::DeepDive => {
                "Go deep on one facet of the topic. Pick the least obvious fact from the source material and build the post around it."
            }
            PostType::Question => {
                "End with one open question readers will want to answer from their own experience. The body sets up the question with a concrete observation."
            }
            PostType::Ritual => {
                "Describe one small practice the reader can actually do today, drawn from the source material. Steps, not vibes."
            }
            PostType::Persona => {
                "Address readers who have this placement or draw this card. Describe what they may notice, using hedged language."
            }
            PostType::VideoCaption => {
                "Write a caption for a short educational video on the topic. First line hooks; the rest summarizes what the video covers."
            }
            PostType::MythBust => {
                "Name a common misconception about the topic, then correct it with what the source material actually says."
            }
            PostType::Seasonal => {
                "Connect the topic to the current point in the year. Keep the seasonal link concrete, not decorative."
            }
            PostType::Affirmation => {
                "Build the post around the topic's affirmation. Give one line of context, then the affirmation in quotes."
            }
            PostType::QuickFact => {
                "State one fact from the source material plainly in one or two sentences. No setup, no closing line."
            }
        }
    }
}

impl FromStr for PostType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PostType::ALL
            .iter()
            .find(|t| t.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown post type: {}", s))
    }
}
