//! Maps a 0–100 performance score onto a display tier.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TierColor {
    Zinc,
    Emerald,
    Amber,
    Orange,
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreTier {
    pub label: &'static str,
    pub color: TierColor,
}

pub const NO_DATA: ScoreTier = ScoreTier {
    label: "No data",
    color: TierColor::Zinc,
};
pub const TOP_PERFORMER: ScoreTier = ScoreTier {
    label: "Top performer",
    color: TierColor::Emerald,
};
pub const MODERATE: ScoreTier = ScoreTier {
    label: "Moderate",
    color: TierColor::Amber,
};
pub const LOW: ScoreTier = ScoreTier {
    label: "Low",
    color: TierColor::Orange,
};
pub const UNDERPERFORMING: ScoreTier = ScoreTier {
    label: "Underperforming",
    color: TierColor::Red,
};

/// Classify a score. NaN counts as zero; everything else is clamped to `[0, 100]`.
#[must_use]
pub fn tier(score: f64) -> ScoreTier {
    let score = if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    };

    if score <= 0.0 {
        NO_DATA
    } else if score >= 80.0 {
        TOP_PERFORMER
    } else if score >= 50.0 {
        MODERATE
    } else if score >= 20.0 {
        LOW
    } else {
        UNDERPERFORMING
    }
}
