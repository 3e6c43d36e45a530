// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Target platforms and their formatting strategies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported social platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Bluesky,
    LinkedIn,
    TikTok,
    Instagram,
    Threads,
    Pinterest,
}

impl Platform {
    pub const ALL: [Platform; 7] = [
        Platform::Twitter,
        Platform::Bluesky,
        Platform::LinkedIn,
        Platform::TikTok,
        Platform::Instagram,
        Platform::Threads,
        Platform::Pinterest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Twitter => "twitter",
            Platform::Bluesky => "bluesky",
            Platform::LinkedIn => "linkedin",
            Platform::TikTok => "tiktok",
            Platform::Instagram => "instagram",
            Platform::Threads => "threads",
            Platform::Pinterest => "pinterest",
        }
    }

    /// Formatting strategy for this platform.
    pub fn strategy(&self) -> PlatformStrategy {
        match self {
            Platform::Twitter => PlatformStrategy {
                max_chars: 280,
                hashtag_budget: 2,
                style: PostStyle::Short,
                tone: "punchy and direct, one idea per post",
            },
            Platform::Bluesky => PlatformStrategy {
                max_chars: 300,
                hashtag_budget: 3,
                style: PostStyle::Short,
                tone: "conversational and specific",
            },
            Platform::LinkedIn => PlatformStrategy {
                max_chars: 3000,
                hashtag_budget: 3,
                style: PostStyle::Long,
                tone: "grounded and reflective, no hype",
            },
            Platform::TikTok => PlatformStrategy {
                max_chars: 2200,
                hashtag_budget: 3,
                style: PostStyle::Long,
                tone: "spoken-word pacing, short lines",
            },
            Platform::Instagram => PlatformStrategy {
                max_chars: 2200,
                hashtag_budget: 3,
                style: PostStyle::Long,
                tone: "warm and observational",
            },
            Platform::Threads => PlatformStrategy {
                max_chars: 500,
                hashtag_budget: 0,
                style: PostStyle::Short,
                tone: "casual, like a note to a friend",
            },
            Platform::Pinterest => PlatformStrategy {
                max_chars: 500,
                hashtag_budget: 3,
                style: PostStyle::Long,
                tone: "descriptive and searchable",
            },
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "twitter" | "x" => Ok(Platform::Twitter),
            "bluesky" => Ok(Platform::Bluesky),
            "linkedin" => Ok(Platform::LinkedIn),
            "tiktok" => Ok(Platform::TikTok),
            "instagram" => Ok(Platform::Instagram),
            "threads" => Ok(Platform::Threads),
            "pinterest" => Ok(Platform::Pinterest),
            other => Err(format!("unknown platform: {}", other)),
        }
    }
}

/// Whether the platform wants a one-liner or an essay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostStyle {
    Short,
    Long,
}

/// Length limits and tone modifiers for one platform.
#[derive(Debug, Clone, Copy)]
pub struct PlatformStrategy {
    /// Hard character budget for body + hashtags combined
    pub max_chars: usize,
    /// Maximum number of hashtags
    pub hashtag_budget: usize,
    pub style: PostStyle,
    /// Tone modifier rendered into the prompt
    pub tone: &'static str,
}
