//! Engagement weighting and the per-piece composite score.

use adforge_core::{EngagementCounts, Rating};
use serde::Serialize;

/// Multipliers applied to each manually logged counter.
///
/// Active signals (likes, comments, shares) outweigh passive views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EngagementWeights {
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
}

pub const ENGAGEMENT_WEIGHTS: EngagementWeights = EngagementWeights {
    views: 1,
    likes: 3,
    comments: 4,
    shares: 5,
};

pub const CLICK_WEIGHT: f64 = 0.4;
pub const ENGAGEMENT_WEIGHT: f64 = 0.4;
pub const RATING_WEIGHT: f64 = 0.2;

/// Weighted sum of the logged counters; unlogged counters count as zero.
#[must_use]
pub fn engagement_raw(counts: &EngagementCounts) -> u64 {
    let w = ENGAGEMENT_WEIGHTS;
    let v = |c: Option<u32>| u64::from(c.unwrap_or(0));
    v(counts.views) * w.views
        + v(counts.likes) * w.likes
        + v(counts.comments) * w.comments
        + v(counts.shares) * w.shares
}

/// 100 for a thumbs-up, 0 for a thumbs-down, 50 otherwise.
#[must_use]
pub fn rating_signal(rating: Option<Rating>) -> f64 {
    match rating {
        Some(Rating::ThumbsUp) => 100.0,
        Some(Rating::ThumbsDown) => 0.0,
        Some(Rating::Neutral) | None => 50.0,
    }
}

/// `value / max * 100`, with the denominator floored at 1 and the result
/// capped at 100.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn relative_signal(value: u64, max: u64) -> f64 {
    let denom = max.max(1) as f64;
    (value as f64 / denom * 100.0).min(100.0)
}

/// Blend click, engagement and rating signals into a 0–100 score.
///
/// `max_clicks` and `max_engagement` are the maxima of the cohort being
/// scored in the same call.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn composite_score(
    clicks: u64,
    engagement: u64,
    rating: Option<Rating>,
    max_clicks: u64,
    max_engagement: u64,
) -> u8 {
    let blended = relative_signal(clicks, max_clicks) * CLICK_WEIGHT
        + relative_signal(engagement, max_engagement) * ENGAGEMENT_WEIGHT
        + rating_signal(rating) * RATING_WEIGHT;
    blended.round().clamp(0.0, 100.0) as u8
}

/// `round(value / max * 100)` for roll-ups, denominator floored at 1.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn normalized_score(value: u64, max: u64) -> u8 {
    relative_signal(value, max).round().clamp(0.0, 100.0) as u8
}
