//! Scoring, roll-ups and learning extraction over marketing content, plus
//! the report builders that feed them from the database.

pub mod engagement;
pub mod error;
pub mod learning;
pub mod report;
pub mod rollup;
pub mod scoring;
pub mod tier;

pub use engagement::{
    composite_score, engagement_raw, normalized_score, EngagementWeights, ENGAGEMENT_WEIGHTS,
};
pub use error::ReportError;
pub use learning::{
    extract_insights, Frequency, LearningCandidate, LearningInsights, LengthBucket, PieceInsight,
    StyleCues, SuccessPatterns,
};
pub use report::{
    insights_report, performance_report, InsightsReport, PerformanceReport, PieceScore,
};
pub use rollup::{
    roll_up, AvatarRollup, CampaignClicks, CampaignRollup, ChannelRollup, PerformanceRollup,
};
pub use scoring::{score_pieces, ScoredPiece, ScoringInput};
pub use tier::{tier, ScoreTier, TierColor};
