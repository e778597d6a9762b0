use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::lifecycle::PieceState;

/// Publication status of a content piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Draft,
    Approved,
    Scheduled,
    Posted,
}

impl ContentStatus {
    pub const ALL: [ContentStatus; 4] = [
        ContentStatus::Draft,
        ContentStatus::Approved,
        ContentStatus::Scheduled,
        ContentStatus::Posted,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContentStatus::Draft => "draft",
            ContentStatus::Approved => "approved",
            ContentStatus::Scheduled => "scheduled",
            ContentStatus::Posted => "posted",
        }
    }
}

impl std::fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(ContentStatus::Draft),
            "approved" => Ok(ContentStatus::Approved),
            "scheduled" => Ok(ContentStatus::Scheduled),
            "posted" => Ok(ContentStatus::Posted),
            _ => Err(UnknownVariant::new("content status", s)),
        }
    }
}

/// Format of a generated artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    Post,
    Email,
    Ad,
    Script,
}

impl ContentFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContentFormat::Post => "post",
            ContentFormat::Email => "email",
            ContentFormat::Ad => "ad",
            ContentFormat::Script => "script",
        }
    }
}

impl std::fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentFormat {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "post" => Ok(ContentFormat::Post),
            "email" => Ok(ContentFormat::Email),
            "ad" => Ok(ContentFormat::Ad),
            "script" => Ok(ContentFormat::Script),
            _ => Err(UnknownVariant::new("content format", s)),
        }
    }
}

/// Manual thumbs rating. Stored as `-1`, `0` or `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i16", try_from = "i16")]
pub enum Rating {
    ThumbsDown,
    Neutral,
    ThumbsUp,
}

impl Rating {
    #[must_use]
    pub fn value(self) -> i16 {
        match self {
            Rating::ThumbsDown => -1,
            Rating::Neutral => 0,
            Rating::ThumbsUp => 1,
        }
    }
}

impl From<Rating> for i16 {
    fn from(rating: Rating) -> Self {
        rating.value()
    }
}

impl TryFrom<i16> for Rating {
    type Error = UnknownVariant;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Rating::ThumbsDown),
            0 => Ok(Rating::Neutral),
            1 => Ok(Rating::ThumbsUp),
            other => Err(UnknownVariant::new("rating", &other.to_string())),
        }
    }
}

/// Returned when a stored or user-supplied string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Manually logged social engagement counters. `None` means "never logged".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementCounts {
    pub views: Option<u32>,
    pub likes: Option<u32>,
    pub comments: Option<u32>,
    pub shares: Option<u32>,
}

impl EngagementCounts {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.views.is_none() && self.likes.is_none() && self.comments.is_none() && self.shares.is_none()
    }
}

/// A single generated artifact (post, email, ad, script) and its publication state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPiece {
    pub id: Uuid,
    pub product_id: Uuid,
    pub campaign_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub format: ContentFormat,
    pub title: String,
    pub body: String,
    pub status: ContentStatus,
    pub archived: bool,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub posted_at: Option<DateTime<Utc>>,
    pub rating: Option<Rating>,
    pub engagement: EngagementCounts,
    pub engagement_logged_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ContentPiece {
    /// The subset of fields the lifecycle planner reads.
    #[must_use]
    pub fn lifecycle_state(&self) -> PieceState {
        PieceState {
            status: self.status,
            archived: self.archived,
            scheduled_for: self.scheduled_for,
            posted_at: self.posted_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Scheduled".parse::<ContentStatus>(), Ok(ContentStatus::Scheduled));
        assert_eq!(" posted ".parse::<ContentStatus>(), Ok(ContentStatus::Posted));
    }

    #[test]
    fn status_rejects_unknown_value() {
        let err = "archived".parse::<ContentStatus>().unwrap_err();
        assert_eq!(err.kind, "content status");
        assert_eq!(err.to_string(), "unknown content status: 'archived'");
    }

    #[test]
    fn status_display_matches_serde() {
        for status in ContentStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }

    #[test]
    fn rating_round_trips_through_i16() {
        assert_eq!(Rating::try_from(-1), Ok(Rating::ThumbsDown));
        assert_eq!(i16::from(Rating::ThumbsUp), 1);
        assert!(Rating::try_from(2).is_err());
    }

    #[test]
    fn rating_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Rating::ThumbsDown).unwrap(), "-1");
        let parsed: Rating = serde_json::from_str("0").unwrap();
        assert_eq!(parsed, Rating::Neutral);
    }

    #[test]
    fn engagement_counts_default_is_empty() {
        assert!(EngagementCounts::default().is_empty());
        let logged = EngagementCounts {
            likes: Some(0),
            ..EngagementCounts::default()
        };
        assert!(!logged.is_empty());
    }
}
