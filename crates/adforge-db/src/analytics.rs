//! Read-side queries feeding the performance and insight reports.
//!
//! Clicks always come from the denormalized `tracked_links.click_count`.
//! A link counts toward a campaign through its own `campaign_id`, or failing
//! that through its content piece's campaign.

use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// One campaign with the clicks attributed to it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CampaignClicksRow {
    pub campaign_id: Uuid,
    pub avatar_id: Uuid,
    pub avatar_name: String,
    pub channel: String,
    pub angle: String,
    pub total_clicks: i64,
}

/// One piece with its raw scoring signals and campaign context.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PieceSignalsRow {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub content_type: String,
    pub status: String,
    pub archived: bool,
    pub rating: Option<i16>,
    pub views: Option<i32>,
    pub likes: Option<i32>,
    pub comments: Option<i32>,
    pub shares: Option<i32>,
    pub clicks: i64,
    pub angle: Option<String>,
    pub hook: Option<String>,
    pub channel: Option<String>,
    pub avatar_name: Option<String>,
    pub pain_points: Vec<String>,
}

/// Click totals for every campaign of a product, oldest campaign first.
/// Campaigns without clicks are included with zero.
///
/// Links on archived pieces are left out unless `include_archived` is set.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_campaign_clicks(
    pool: &PgPool,
    product_id: Uuid,
    include_archived: bool,
) -> Result<Vec<CampaignClicksRow>, DbError> {
    let rows = sqlx::query_as::<_, CampaignClicksRow>(
        "WITH attributed AS ( \
             SELECT COALESCE(l.campaign_id, p.campaign_id) AS campaign_id, l.click_count \
             FROM tracked_links l \
             LEFT JOIN content_pieces p ON p.id = l.content_piece_id \
             WHERE p.id IS NULL OR $2 OR p.archived = false \
         ) \
         SELECT c.id AS campaign_id, c.avatar_id, a.name AS avatar_name, c.channel, c.angle, \
                COALESCE(SUM(t.click_count), 0)::BIGINT AS total_clicks \
         FROM campaigns c \
         JOIN avatars a ON a.id = c.avatar_id \
         LEFT JOIN attributed t ON t.campaign_id = c.id \
         WHERE c.product_id = $1 \
         GROUP BY c.id, c.avatar_id, a.name, c.channel, c.angle, c.created_at \
         ORDER BY c.created_at, c.id",
    )
    .bind(product_id)
    .bind(include_archived)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Scoring signals for every piece of a product, oldest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_piece_signals(
    pool: &PgPool,
    product_id: Uuid,
    include_archived: bool,
) -> Result<Vec<PieceSignalsRow>, DbError> {
    let rows = sqlx::query_as::<_, PieceSignalsRow>(
        "SELECT p.id, p.title, p.body, p.content_type, p.status, p.archived, p.rating, \
                p.views, p.likes, p.comments, p.shares, \
                COALESCE((SELECT SUM(l.click_count) FROM tracked_links l \
                          WHERE l.content_piece_id = p.id), 0)::BIGINT AS clicks, \
                c.angle, c.hook, c.channel, a.name AS avatar_name, \
                COALESCE(a.pain_points, '{}'::TEXT[]) AS pain_points \
         FROM content_pieces p \
         LEFT JOIN campaigns c ON c.id = p.campaign_id \
         LEFT JOIN avatars a ON a.id = c.avatar_id \
         WHERE p.product_id = $1 AND ($2 OR p.archived = false) \
         ORDER BY p.created_at, p.id",
    )
    .bind(product_id)
    .bind(include_archived)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
