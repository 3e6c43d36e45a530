//! Cosmic gifts sent between connected friends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What kind of gift was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GiftKind {
    Crystal,
    TarotCard,
    MoonBlessing,
    Affirmation,
}

impl GiftKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GiftKind::Crystal => "crystal",
            GiftKind::TarotCard => "tarot_card",
            GiftKind::MoonBlessing => "moon_blessing",
            GiftKind::Affirmation => "affirmation",
        }
    }
}

/// Maximum length of the optional gift message.
pub const GIFT_MESSAGE_MAX_CHARS: usize = 280;

/// A cosmic gift row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CosmicGift {
    pub id: Uuid,
    pub sender_id: String,
    pub recipient_id: String,
    pub kind: String,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub claimed_at: Option<DateTime<Utc>>,
}

impl CosmicGift {
    pub fn new(
        sender_id: &str,
        recipient_id: &str,
        kind: GiftKind,
        message: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender_id: sender_id.to_string(),
            recipient_id: recipient_id.to_string(),
            kind: kind.as_str().to_string(),
            message,
            created_at: now,
            claimed_at: None,
        }
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_gift_is_unclaimed() {
        let gift = CosmicGift::new(
            "sender",
            "recipient",
            GiftKind::MoonBlessing,
            Some("for your full moon ritual".to_string()),
            Utc::now(),
        );

        assert!(!gift.is_claimed());
        assert_eq!(gift.kind, "moon_blessing");
    }

    #[test]
    fn test_gift_kind_serde_names() {
        let json = serde_json::to_string(&GiftKind::TarotCard).unwrap();
        assert_eq!(json, "\"tarot_card\"");

        let parsed: GiftKind = serde_json::from_str("\"crystal\"").unwrap();
        assert_eq!(parsed, GiftKind::Crystal);
    }
}
