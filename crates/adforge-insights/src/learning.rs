//! Learning extraction: which pieces worked, which didn't, and what the
//! winners have in common.

use std::collections::HashMap;
use std::sync::LazyLock;

use adforge_core::{ContentFormat, Rating};
use regex::Regex;
use serde::Serialize;
use uuid::Uuid;

use crate::scoring::ScoredPiece;
use crate::tier::ScoreTier;

pub const TOP_PERFORMER_MIN_SCORE: u8 = 70;
pub const UNDERPERFORMER_MAX_SCORE: u8 = 30;
pub const MAX_LISTED_PIECES: usize = 5;
pub const SNIPPET_CHARS: usize = 300;

const TOP_PAIN_POINTS: usize = 5;
const TOP_CHANNELS: usize = 3;
const TOP_CONTENT_TYPES: usize = 3;

const SHORT_BODY_CHARS: usize = 280;
const LONG_BODY_CHARS: usize = 1000;
const CUE_SHARE_THRESHOLD: u8 = 50;

static LIST_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*(?:[-*•]|\d+[.)])\s+").expect("valid regex"));

/// A scored piece together with the campaign context it was written for.
#[derive(Debug, Clone)]
pub struct LearningCandidate {
    pub scored: ScoredPiece,
    pub rating: Option<Rating>,
    pub title: String,
    pub angle: Option<String>,
    pub hook: Option<String>,
    pub channel: Option<String>,
    pub content_type: ContentFormat,
    pub avatar_name: Option<String>,
    pub pain_points: Vec<String>,
    pub body: String,
}

impl LearningCandidate {
    fn has_signal(&self) -> bool {
        self.scored.clicks > 0 || self.scored.engagement_raw > 0 || self.rating.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieceInsight {
    pub content_piece_id: Uuid,
    pub title: String,
    pub angle: Option<String>,
    pub hook: Option<String>,
    pub channel: Option<String>,
    pub content_type: ContentFormat,
    pub avatar_name: Option<String>,
    pub pain_points: Vec<String>,
    pub snippet: String,
    pub composite_score: u8,
    pub tier: ScoreTier,
    pub clicks: u64,
    pub engagement_raw: u64,
    pub rating: Option<Rating>,
}

impl From<&LearningCandidate> for PieceInsight {
    fn from(c: &LearningCandidate) -> Self {
        Self {
            content_piece_id: c.scored.content_piece_id,
            title: c.title.clone(),
            angle: c.angle.clone(),
            hook: c.hook.clone(),
            channel: c.channel.clone(),
            content_type: c.content_type,
            avatar_name: c.avatar_name.clone(),
            pain_points: c.pain_points.clone(),
            snippet: snippet(&c.body),
            composite_score: c.scored.composite_score,
            tier: c.scored.tier(),
            clicks: c.scored.clicks,
            engagement_raw: c.scored.engagement_raw,
            rating: c.rating,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frequency {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthBucket {
    Short,
    Medium,
    Long,
}

impl LengthBucket {
    #[must_use]
    pub fn for_length(chars: usize) -> Self {
        if chars < SHORT_BODY_CHARS {
            Self::Short
        } else if chars < LONG_BODY_CHARS {
            Self::Medium
        } else {
            Self::Long
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleCues {
    /// Percentage (0–100) of bodies containing a question mark.
    pub question_share: u8,
    /// Percentage (0–100) of bodies with at least one bullet or numbered line.
    pub bullet_share: u8,
    pub average_length: usize,
    pub length_bucket: LengthBucket,
    pub cues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuccessPatterns {
    pub top_pain_points: Vec<Frequency>,
    pub top_channels: Vec<Frequency>,
    pub top_content_types: Vec<Frequency>,
    pub style_cues: StyleCues,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearningInsights {
    pub scored_count: usize,
    pub top_performers: Vec<PieceInsight>,
    pub underperformers: Vec<PieceInsight>,
    pub thumbs_down: Vec<PieceInsight>,
    pub patterns: SuccessPatterns,
}

/// Summarize what worked across one product's scored pieces.
///
/// Returns `None` when there are no candidates or none of them carries a
/// click, engagement or rating signal.
#[must_use]
pub fn extract_insights(candidates: &[LearningCandidate]) -> Option<LearningInsights> {
    let mut ranked: Vec<&LearningCandidate> =
        candidates.iter().filter(|c| c.has_signal()).collect();
    if ranked.is_empty() {
        return None;
    }
    ranked.sort_by(|a, b| b.scored.composite_score.cmp(&a.scored.composite_score));

    let top_performers = ranked
        .iter()
        .filter(|c| c.scored.composite_score >= TOP_PERFORMER_MIN_SCORE)
        .take(MAX_LISTED_PIECES)
        .map(|c| PieceInsight::from(*c))
        .collect();

    // thumbs-down pieces are reported on their own, not as underperformers
    let mut lowest_first = ranked.clone();
    lowest_first.sort_by(|a, b| a.scored.composite_score.cmp(&b.scored.composite_score));
    let underperformers = lowest_first
        .iter()
        .filter(|c| {
            c.scored.composite_score <= UNDERPERFORMER_MAX_SCORE
                && c.rating != Some(Rating::ThumbsDown)
        })
        .take(MAX_LISTED_PIECES)
        .map(|c| PieceInsight::from(*c))
        .collect();

    let thumbs_down = ranked
        .iter()
        .filter(|c| c.rating == Some(Rating::ThumbsDown))
        .map(|c| PieceInsight::from(*c))
        .collect();

    let top_half = &ranked[..ranked.len().div_ceil(2)];

    Some(LearningInsights {
        scored_count: ranked.len(),
        top_performers,
        underperformers,
        thumbs_down,
        patterns: success_patterns(top_half),
    })
}

fn success_patterns(top_half: &[&LearningCandidate]) -> SuccessPatterns {
    let pain_points = top_half
        .iter()
        .flat_map(|c| c.pain_points.iter().map(String::as_str));
    let channels = top_half.iter().filter_map(|c| c.channel.as_deref());
    let content_types = top_half.iter().map(|c| c.content_type.as_str());

    SuccessPatterns {
        top_pain_points: top_frequencies(pain_points, TOP_PAIN_POINTS, true),
        top_channels: top_frequencies(channels, TOP_CHANNELS, false),
        top_content_types: top_frequencies(content_types, TOP_CONTENT_TYPES, false),
        style_cues: style_cues(top_half.iter().map(|c| c.body.as_str())),
    }
}

/// Count trimmed values, most frequent first. Ties keep first-seen order and
/// the reported spelling is the first one seen.
fn top_frequencies<'a>(
    values: impl Iterator<Item = &'a str>,
    limit: usize,
    fold_case: bool,
) -> Vec<Frequency> {
    let mut counts: Vec<Frequency> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for raw in values {
        let value = raw.trim();
        if value.is_empty() {
            continue;
        }
        let key = if fold_case {
            value.to_lowercase()
        } else {
            value.to_string()
        };
        match index.get(&key) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(key, counts.len());
                counts.push(Frequency {
                    value: value.to_string(),
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

fn style_cues<'a>(bodies: impl Iterator<Item = &'a str>) -> StyleCues {
    let mut total = 0_usize;
    let mut questions = 0_usize;
    let mut bulleted = 0_usize;
    let mut chars = 0_usize;

    for body in bodies {
        total += 1;
        chars += body.chars().count();
        if body.contains('?') {
            questions += 1;
        }
        if LIST_LINE.is_match(body) {
            bulleted += 1;
        }
    }

    let average_length = if total == 0 { 0 } else { chars / total };
    let length_bucket = LengthBucket::for_length(average_length);
    let question_share = share(questions, total);
    let bullet_share = share(bulleted, total);

    let mut cues = Vec::new();
    if question_share >= CUE_SHARE_THRESHOLD {
        cues.push(format!("Asks the reader a question ({question_share}% of top pieces)"));
    }
    if bullet_share >= CUE_SHARE_THRESHOLD {
        cues.push(format!("Uses bullet or numbered lists ({bullet_share}% of top pieces)"));
    }
    cues.push(match length_bucket {
        LengthBucket::Short => format!("Short copy, about {average_length} characters"),
        LengthBucket::Medium => format!("Medium-length copy, about {average_length} characters"),
        LengthBucket::Long => format!("Long-form copy, about {average_length} characters"),
    });

    StyleCues {
        question_share,
        bullet_share,
        average_length,
        length_bucket,
        cues,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn share(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((part * 200 + total) / (total * 2)).min(100) as u8
}

fn snippet(body: &str) -> String {
    body.chars().take(SNIPPET_CHARS).collect()
}

#[cfg(test)]
#[path = "learning_test.rs"]
mod tests;
