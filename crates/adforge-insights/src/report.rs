//! Report builders: load the current rows for one product, then score and
//! roll them up. Nothing is cached between calls.

use std::collections::HashMap;

use adforge_core::{
    ActingRole, ContentFormat, ContentStatus, EngagementCounts, LifecycleError, Product, Rating,
};
use adforge_db::{CampaignClicksRow, DbError, PieceSignalsRow};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ReportError;
use crate::learning::{extract_insights, LearningCandidate, LearningInsights};
use crate::rollup::{roll_up, CampaignClicks, PerformanceRollup};
use crate::scoring::{score_pieces, ScoredPiece, ScoringInput};
use crate::tier::ScoreTier;

/// One scored piece as listed in the performance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieceScore {
    pub content_piece_id: Uuid,
    pub title: String,
    pub status: ContentStatus,
    pub archived: bool,
    pub clicks: u64,
    pub engagement_raw: u64,
    pub composite_score: u8,
    pub tier: ScoreTier,
}

#[derive(Debug, Clone, Serialize)]
pub struct PerformanceReport {
    pub product_id: Uuid,
    pub product_name: String,
    pub include_archived: bool,
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub rollup: PerformanceRollup,
    /// Highest composite score first.
    pub pieces: Vec<PieceScore>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsightsReport {
    pub product_id: Uuid,
    pub product_name: String,
    pub generated_at: DateTime<Utc>,
    /// `None` when no piece carries any signal yet.
    pub insights: Option<LearningInsights>,
}

/// Build the performance report for a product.
///
/// # Errors
///
/// Returns [`ReportError::Access`] when a non-admin asks for archived pieces,
/// [`ReportError::ProductNotFound`] for an unknown product, or
/// [`ReportError::Db`] if a query fails or a stored row is invalid.
pub async fn performance_report(
    pool: &PgPool,
    product_id: Uuid,
    role: ActingRole,
    include_archived: bool,
) -> Result<PerformanceReport, ReportError> {
    if include_archived && !role.can_view_archived() {
        return Err(LifecycleError::Forbidden {
            role,
            action: "view archived content",
        }
        .into());
    }

    let product = load_product(pool, product_id).await?;
    let campaigns = adforge_db::list_campaign_clicks(pool, product_id, include_archived).await?;
    let signals = adforge_db::list_piece_signals(pool, product_id, include_archived).await?;

    let rollup = roll_up(&campaigns.iter().map(campaign_clicks).collect::<Vec<_>>());
    let pieces = piece_scores(&signals)?;

    tracing::info!(
        product = %product_id,
        role = %role,
        include_archived,
        campaigns = campaigns.len(),
        scored = pieces.len(),
        total_clicks = rollup.total_clicks,
        "performance report built"
    );

    Ok(PerformanceReport {
        product_id,
        product_name: product.name,
        include_archived,
        generated_at: Utc::now(),
        rollup,
        pieces,
    })
}

/// Build the learning report for a product from its non-archived pieces.
///
/// # Errors
///
/// Returns [`ReportError::ProductNotFound`] for an unknown product, or
/// [`ReportError::Db`] if a query fails or a stored row is invalid.
pub async fn insights_report(
    pool: &PgPool,
    product_id: Uuid,
    role: ActingRole,
) -> Result<InsightsReport, ReportError> {
    let product = load_product(pool, product_id).await?;
    let signals = adforge_db::list_piece_signals(pool, product_id, false).await?;
    let candidates = learning_candidates(&signals)?;
    let insights = extract_insights(&candidates);

    tracing::info!(
        product = %product_id,
        role = %role,
        candidates = candidates.len(),
        has_insights = insights.is_some(),
        "insights report built"
    );

    Ok(InsightsReport {
        product_id,
        product_name: product.name,
        generated_at: Utc::now(),
        insights,
    })
}

async fn load_product(
    pool: &PgPool,
    product_id: Uuid,
) -> Result<Product, ReportError> {
    match adforge_db::get_product(pool, product_id).await {
        Ok(product) => Ok(product),
        Err(DbError::NotFound) => Err(ReportError::ProductNotFound(product_id)),
        Err(e) => Err(e.into()),
    }
}

fn campaign_clicks(row: &CampaignClicksRow) -> CampaignClicks {
    CampaignClicks {
        campaign_id: row.campaign_id,
        avatar_id: row.avatar_id,
        avatar_name: row.avatar_name.clone(),
        channel: row.channel.clone(),
        angle: row.angle.clone(),
        total_clicks: u64::try_from(row.total_clicks).unwrap_or(0),
    }
}

fn scoring_input(row: &PieceSignalsRow) -> Result<ScoringInput, DbError> {
    let invalid = |reason: String| DbError::InvalidRow { id: row.id, reason };
    let counter = |name: &str, value: Option<i32>| {
        value
            .map(u32::try_from)
            .transpose()
            .map_err(|_| invalid(format!("{name} is negative")))
    };

    Ok(ScoringInput {
        content_piece_id: row.id,
        clicks: u64::try_from(row.clicks).unwrap_or(0),
        engagement: EngagementCounts {
            views: counter("views", row.views)?,
            likes: counter("likes", row.likes)?,
            comments: counter("comments", row.comments)?,
            shares: counter("shares", row.shares)?,
        },
        rating: rating(row)?,
    })
}

fn rating(row: &PieceSignalsRow) -> Result<Option<Rating>, DbError> {
    row.rating
        .map(Rating::try_from)
        .transpose()
        .map_err(|e| DbError::InvalidRow {
            id: row.id,
            reason: e.to_string(),
        })
}

/// Score a cohort and pair each scored piece with the row it came from.
fn scored_rows(
    signals: &[PieceSignalsRow],
) -> Result<Vec<(&PieceSignalsRow, ScoredPiece)>, DbError> {
    let inputs = signals
        .iter()
        .map(scoring_input)
        .collect::<Result<Vec<_>, _>>()?;
    let by_id: HashMap<Uuid, &PieceSignalsRow> = signals.iter().map(|r| (r.id, r)).collect();

    Ok(score_pieces(&inputs)
        .into_iter()
        .filter_map(|scored| by_id.get(&scored.content_piece_id).map(|row| (*row, scored)))
        .collect())
}

fn piece_scores(signals: &[PieceSignalsRow]) -> Result<Vec<PieceScore>, DbError> {
    let mut pieces = scored_rows(signals)?
        .into_iter()
        .map(|(row, scored)| {
            let status = row
                .status
                .parse::<ContentStatus>()
                .map_err(|e| DbError::InvalidRow {
                    id: row.id,
                    reason: e.to_string(),
                })?;
            Ok(PieceScore {
                content_piece_id: row.id,
                title: row.title.clone(),
                status,
                archived: row.archived,
                clicks: scored.clicks,
                engagement_raw: scored.engagement_raw,
                composite_score: scored.composite_score,
                tier: scored.tier(),
            })
        })
        .collect::<Result<Vec<_>, DbError>>()?;

    pieces.sort_by(|a, b| b.composite_score.cmp(&a.composite_score));
    Ok(pieces)
}

fn learning_candidates(signals: &[PieceSignalsRow]) -> Result<Vec<LearningCandidate>, DbError> {
    scored_rows(signals)?
        .into_iter()
        .map(|(row, scored)| {
            let content_type = row
                .content_type
                .parse::<ContentFormat>()
                .map_err(|e| DbError::InvalidRow {
                    id: row.id,
                    reason: e.to_string(),
                })?;
            Ok(LearningCandidate {
                scored,
                rating: rating(row)?,
                title: row.title.clone(),
                angle: row.angle.clone(),
                hook: row.hook.clone(),
                channel: row.channel.clone(),
                content_type,
                avatar_name: row.avatar_name.clone(),
                pain_points: row.pain_points.clone(),
                body: row.body.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(title: &str, clicks: i64, likes: Option<i32>, rating: Option<i16>) -> PieceSignalsRow {
        PieceSignalsRow {
            id: Uuid::new_v4(),
            title: title.to_string(),
            body: "Body?".to_string(),
            content_type: "post".to_string(),
            status: "posted".to_string(),
            archived: false,
            rating,
            views: None,
            likes,
            comments: None,
            shares: None,
            clicks,
            angle: Some("Better sleep".to_string()),
            hook: None,
            channel: Some("instagram".to_string()),
            avatar_name: Some("Nadia".to_string()),
            pain_points: vec!["eye strain".to_string()],
        }
    }

    #[test]
    fn piece_scores_skip_silent_pieces_and_sort_by_score() {
        let rows = vec![
            row("low", 1, None, None),
            row("silent", 0, None, None),
            row("high", 10, Some(20), Some(1)),
        ];
        let pieces = piece_scores(&rows).expect("valid rows");
        let titles: Vec<&str> = pieces.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["high", "low"]);
        assert_eq!(pieces[0].composite_score, 100);
        assert_eq!(pieces[0].tier.label, "Top performer");
        assert_eq!(pieces[0].engagement_raw, 60);
    }

    #[test]
    fn invalid_rating_surfaces_as_invalid_row() {
        let rows = vec![row("bad", 1, None, Some(5))];
        assert!(matches!(
            piece_scores(&rows),
            Err(DbError::InvalidRow { .. })
        ));
    }

    #[test]
    fn negative_counter_surfaces_as_invalid_row() {
        let rows = vec![row("bad", 1, Some(-1), None)];
        let err = piece_scores(&rows).unwrap_err();
        assert!(err.to_string().contains("likes is negative"));
    }

    #[test]
    fn learning_candidates_carry_campaign_context() {
        let rows = vec![row("a", 4, None, Some(-1)), row("b", 0, None, None)];
        let candidates = learning_candidates(&rows).expect("valid rows");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].rating, Some(Rating::ThumbsDown));
        assert_eq!(candidates[0].channel.as_deref(), Some("instagram"));
        assert_eq!(candidates[0].content_type, ContentFormat::Post);
    }

    #[test]
    fn campaign_clicks_clamp_negative_totals() {
        let converted = campaign_clicks(&CampaignClicksRow {
            campaign_id: Uuid::new_v4(),
            avatar_id: Uuid::new_v4(),
            avatar_name: "Nadia".to_string(),
            channel: "email".to_string(),
            angle: "Save time".to_string(),
            total_clicks: -4,
        });
        assert_eq!(converted.total_clicks, 0);
    }
}
