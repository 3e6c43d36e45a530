// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The social-copy pipeline: one model call, validation, one corrective
//! retry, then the deterministic fallback.
//!
//! Failure semantics: this pipeline always succeeds. A caller gets
//! usable copy whether the generation API cooperates, misbehaves, or is
//! down; the outcome records which path produced it.

use crate::services::generation::{GeneratedDraft, GenerationClient};
use crate::social::fallback::compose_fallback;
use crate::social::format::fit_to_budget;
use crate::social::platform::Platform;
use crate::social::post_type::PostType;
use crate::social::prompt::{build_prompt, SYSTEM_PROMPT};
use crate::social::source_pack::SourcePack;
use crate::social::validate::validate_draft;
use crate::social::SocialPost;

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub post: SocialPost,
    /// Model attempts made (0 when the client errored before a draft)
    pub attempts: u32,
    pub used_fallback: bool,
}

/// The generation pipeline.
#[derive(Clone)]
pub struct CopyGenerator {
    client: GenerationClient,
}

impl CopyGenerator {
    pub fn new(client: GenerationClient) -> Self {
        Self { client }
    }

    /// Generate copy for a topic/platform/post-type combination.
    pub async fn generate(
        &self,
        pack: &SourcePack,
        platform: Platform,
        post_type: PostType,
    ) -> GenerationOutcome {
        let mut attempts = 0u32;

        // ─── Attempt 1 ───────────────────────────────────────────────
        let prompt = build_prompt(pack, platform, post_type, None);
        match self.client.generate_draft(SYSTEM_PROMPT, &prompt).await {
            Ok(draft) => {
                attempts = 1;
                match accept_draft(&draft, pack, platform) {
                    Ok(post) => {
                        return GenerationOutcome {
                            post,
                            attempts,
                            used_fallback: false,
                        }
                    }
                    Err(issues) => {
                        tracing::info!(
                            topic = %pack.topic,
                            platform = %platform,
                            issues = %issues.join("; "),
                            "Draft failed validation, retrying with corrective note"
                        );

                        // ─── Attempt 2: corrective retry ─────────────
                        let retry_prompt =
                            build_prompt(pack, platform, post_type, Some(&issues.join("\n")));
                        match self.client.generate_draft(SYSTEM_PROMPT, &retry_prompt).await {
                            Ok(retry_draft) => {
                                attempts = 2;
                                if let Ok(post) = accept_draft(&retry_draft, pack, platform) {
                                    return GenerationOutcome {
                                        post,
                                        attempts,
                                        used_fallback: false,
                                    };
                                }
                                tracing::warn!(
                                    topic = %pack.topic,
                                    platform = %platform,
                                    "Retry draft failed validation, using fallback"
                                );
                            }
                            Err(e) => {
                                tracing::warn!(
                                    topic = %pack.topic,
                                    error = %e,
                                    "Retry request failed, using fallback"
                                );
                            }
                        }
                    }
                }
            }
            Err(e) if e.is_generation_rate_limit() => {
                tracing::info!(
                    topic = %pack.topic,
                    platform = %platform,
                    "Generation API rate limited, using fallback"
                );
            }
            Err(e) => {
                tracing::warn!(
                    topic = %pack.topic,
                    platform = %platform,
                    error = %e,
                    "Generation request failed, using fallback"
                );
            }
        }

        // ─── Fallback: deterministic templates ───────────────────────
        GenerationOutcome {
            post: fallback_post(pack, platform, post_type),
            attempts,
            used_fallback: true,
        }
    }
}

/// Validate a model draft; on success, format it into its final shape.
fn accept_draft(
    draft: &GeneratedDraft,
    pack: &SourcePack,
    platform: Platform,
) -> Result<SocialPost, Vec<String>> {
    let strategy = platform.strategy();
    let issues = validate_draft(&draft.body, &draft.hashtags, &pack.topic, &strategy);
    if issues.is_empty() {
        Ok(fit_to_budget(&draft.body, &draft.hashtags, &strategy))
    } else {
        Err(issues)
    }
}

/// Compose and format the deterministic fallback post.
fn fallback_post(pack: &SourcePack, platform: Platform, post_type: PostType) -> SocialPost {
    let strategy = platform.strategy();
    let draft = compose_fallback(pack, post_type, &strategy);
    fit_to_budget(&draft.body, &draft.hashtags, &strategy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grimoire::test_fixtures;

    fn pack() -> SourcePack {
        SourcePack::from_snippet(&test_fixtures::scorpio())
    }

    #[test]
    fn test_accept_draft_formats_clean_copy() {
        let draft = GeneratedDraft {
            body: "Scorpio placements tend to notice what others miss.".to_string(),
            hashtags: vec!["#Scorpio".to_string(), "#astrology".to_string()],
        };

        let post = accept_draft(&draft, &pack(), Platform::Twitter).unwrap();
        assert_eq!(post.body, draft.body);
        assert_eq!(post.hashtags, vec!["#scorpio", "#astrology"]);
    }

    #[test]
    fn test_accept_draft_rejects_deterministic_copy() {
        let draft = GeneratedDraft {
            body: "Scorpio always controls the room.".to_string(),
            hashtags: vec![],
        };

        let issues = accept_draft(&draft, &pack(), Platform::Twitter).unwrap_err();
        assert!(issues.iter().any(|i| i.contains("hedged")));
    }

    #[test]
    fn test_fallback_post_fits_every_platform() {
        let pack = pack();
        for platform in Platform::ALL {
            let post = fallback_post(&pack, platform, PostType::DeepDive);
            let strategy = platform.strategy();

            assert!(
                post.rendered().chars().count() <= strategy.max_chars,
                "{} fallback over budget",
                platform
            );
            assert!(post.hashtags.len() <= strategy.hashtag_budget);
        }
    }

    #[tokio::test]
    async fn test_unreachable_api_still_produces_copy() {
        // Unroutable port: both attempts fail at the transport layer and
        // the pipeline must land on the fallback.
        let client = GenerationClient::new(
            "http://127.0.0.1:1/unroutable".to_string(),
            "test-key".to_string(),
        );
        let generator = CopyGenerator::new(client);

        let outcome = generator
            .generate(&pack(), Platform::Bluesky, PostType::Intro)
            .await;

        assert!(outcome.used_fallback);
        assert_eq!(outcome.attempts, 0);
        assert!(!outcome.post.body.is_empty());
        assert!(outcome.post.body.contains("Scorpio"));
    }
}
