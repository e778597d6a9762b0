//! Cohort-relative composite scoring of content pieces.

use adforge_core::{EngagementCounts, Rating};
use serde::Serialize;
use uuid::Uuid;

use crate::engagement::{composite_score, engagement_raw};
use crate::tier::{tier, ScoreTier};

/// Raw signals for one piece, read fresh from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringInput {
    pub content_piece_id: Uuid,
    /// Sum of `click_count` over the piece's tracked links.
    pub clicks: u64,
    pub engagement: EngagementCounts,
    pub rating: Option<Rating>,
}

/// Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredPiece {
    pub content_piece_id: Uuid,
    pub clicks: u64,
    pub engagement_raw: u64,
    pub composite_score: u8,
}

impl ScoredPiece {
    #[must_use]
    pub fn tier(&self) -> ScoreTier {
        tier(f64::from(self.composite_score))
    }
}

/// Score every input that carries at least one signal (clicks, engagement or
/// a rating), relative to the maxima of the whole input set.
///
/// Output keeps input order. Pieces without any signal are left out.
#[must_use]
pub fn score_pieces(inputs: &[ScoringInput]) -> Vec<ScoredPiece> {
    let with_raw: Vec<(&ScoringInput, u64)> = inputs
        .iter()
        .map(|input| (input, engagement_raw(&input.engagement)))
        .collect();

    let max_clicks = with_raw.iter().map(|(i, _)| i.clicks).max().unwrap_or(0);
    let max_engagement = with_raw.iter().map(|(_, e)| *e).max().unwrap_or(0);

    with_raw
        .into_iter()
        .filter(|(input, eng)| input.clicks > 0 || *eng > 0 || input.rating.is_some())
        .map(|(input, eng)| ScoredPiece {
            content_piece_id: input.content_piece_id,
            clicks: input.clicks,
            engagement_raw: eng,
            composite_score: composite_score(
                input.clicks,
                eng,
                input.rating,
                max_clicks,
                max_engagement,
            ),
        })
        .collect()
}
