//! Database operations for the `tracked_links` table.
//!
//! Click counts are maintained by the redirect service; this crate only reads
//! them, apart from the initial value written by seeding.

use adforge_core::TrackedLink;
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::DbError;

/// A row from the `tracked_links` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TrackedLinkRow {
    pub id: Uuid,
    pub slug: String,
    pub destination_url: String,
    pub campaign_id: Option<Uuid>,
    pub content_piece_id: Option<Uuid>,
    pub click_count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<TrackedLinkRow> for TrackedLink {
    fn from(row: TrackedLinkRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            destination_url: row.destination_url,
            campaign_id: row.campaign_id,
            content_piece_id: row.content_piece_id,
            // the column is CHECKed non-negative
            click_count: u32::try_from(row.click_count).unwrap_or(0),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewTrackedLink<'a> {
    pub slug: &'a str,
    pub destination_url: &'a str,
    pub campaign_id: Option<Uuid>,
    pub content_piece_id: Option<Uuid>,
    pub click_count: u32,
}

/// Inserts a tracked link and returns its generated id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails (for example on a duplicate slug).
pub async fn insert_tracked_link<'e>(
    executor: impl PgExecutor<'e>,
    link: &NewTrackedLink<'_>,
) -> Result<Uuid, DbError> {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO tracked_links \
             (id, slug, destination_url, campaign_id, content_piece_id, click_count) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(id)
    .bind(link.slug)
    .bind(link.destination_url)
    .bind(link.campaign_id)
    .bind(link.content_piece_id)
    .bind(i32::try_from(link.click_count).unwrap_or(i32::MAX))
    .execute(executor)
    .await?;
    Ok(id)
}

/// Returns the links pointing at one content piece, most clicked first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_links_for_piece(
    pool: &PgPool,
    content_piece_id: Uuid,
) -> Result<Vec<TrackedLink>, DbError> {
    let rows = sqlx::query_as::<_, TrackedLinkRow>(
        "SELECT id, slug, destination_url, campaign_id, content_piece_id, click_count, created_at \
         FROM tracked_links \
         WHERE content_piece_id = $1 \
         ORDER BY click_count DESC, slug",
    )
    .bind(content_piece_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(TrackedLink::from).collect())
}
