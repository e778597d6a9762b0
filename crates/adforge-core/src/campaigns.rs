use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content::{ContentFormat, UnknownVariant};

/// Broad family of the channel a campaign runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelCategory {
    Social,
    Ad,
    Email,
    Website,
}

impl ChannelCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ChannelCategory::Social => "social",
            ChannelCategory::Ad => "ad",
            ChannelCategory::Email => "email",
            ChannelCategory::Website => "website",
        }
    }
}

impl std::fmt::Display for ChannelCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "social" => Ok(ChannelCategory::Social),
            "ad" => Ok(ChannelCategory::Ad),
            "email" => Ok(ChannelCategory::Email),
            "website" => Ok(ChannelCategory::Website),
            _ => Err(UnknownVariant {
                kind: "channel category",
                value: s.to_string(),
            }),
        }
    }
}

/// The product a user described; owns every other record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A target-customer profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Avatar {
    pub id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    /// Ordered most-important first, as generated.
    pub pain_points: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// One strategic angle: one avatar, one channel, one hook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub product_id: Uuid,
    pub avatar_id: Uuid,
    pub angle: String,
    /// Free-form channel name, e.g. `"instagram"` or `"newsletter"`.
    pub channel: String,
    pub hook: String,
    pub content_type: ContentFormat,
    pub category: ChannelCategory,
    pub destination_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A redirect record with a denormalized click counter maintained by the
/// redirect service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedLink {
    pub id: Uuid,
    pub slug: String,
    pub destination_url: String,
    pub campaign_id: Option<Uuid>,
    pub content_piece_id: Option<Uuid>,
    pub click_count: u32,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_category_parses_known_values() {
        assert_eq!("Website".parse::<ChannelCategory>(), Ok(ChannelCategory::Website));
        assert_eq!("email".parse::<ChannelCategory>(), Ok(ChannelCategory::Email));
    }

    #[test]
    fn channel_category_rejects_unknown() {
        assert!("billboard".parse::<ChannelCategory>().is_err());
    }
}
