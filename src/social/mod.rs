// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Social copy generation: source packs, platform strategies, prompt
//! building, validation, deterministic fallback, and formatting.

pub mod fallback;
pub mod format;
pub mod generator;
pub mod platform;
pub mod post_type;
pub mod prompt;
pub mod source_pack;
pub mod validate;

pub use generator::{CopyGenerator, GenerationOutcome};
pub use platform::Platform;
pub use post_type::PostType;
pub use source_pack::SourcePack;

use serde::Serialize;

/// Final, formatted social copy: body text plus hashtags, together
/// within the platform's character budget.
#[derive(Debug, Clone, Serialize)]
pub struct SocialPost {
    pub body: String,
    pub hashtags: Vec<String>,
}

impl SocialPost {
    /// Body and hashtags as one postable string.
    pub fn rendered(&self) -> String {
        if self.hashtags.is_empty() {
            self.body.clone()
        } else {
            format!("{}\n\n{}", self.body, self.hashtags.join(" "))
        }
    }
}
