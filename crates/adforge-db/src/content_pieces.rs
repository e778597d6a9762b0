//! Database operations for the `content_pieces` table.

use adforge_core::{
    ContentFormat, ContentPiece, ContentStatus, EngagementCounts, PieceState, Rating,
};
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::DbError;

const PIECE_COLUMNS: &str = "id, product_id, campaign_id, content_type, title, body, status, \
     archived, scheduled_for, posted_at, rating, views, likes, comments, shares, \
     engagement_logged_at, created_at, updated_at";

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `content_pieces` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContentPieceRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub campaign_id: Option<Uuid>,
    pub content_type: String,
    pub title: String,
    pub body: String,
    pub status: String,
    pub archived: bool,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub posted_at: Option<DateTime<Utc>>,
    pub rating: Option<i16>,
    pub views: Option<i32>,
    pub likes: Option<i32>,
    pub comments: Option<i32>,
    pub shares: Option<i32>,
    pub engagement_logged_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ContentPieceRow> for ContentPiece {
    type Error = DbError;

    fn try_from(row: ContentPieceRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let invalid = |reason: String| DbError::InvalidRow { id, reason };

        let format = row
            .content_type
            .parse::<ContentFormat>()
            .map_err(|e| invalid(e.to_string()))?;
        let status = parse_status(id, &row.status)?;
        let rating = row
            .rating
            .map(Rating::try_from)
            .transpose()
            .map_err(|e| invalid(e.to_string()))?;
        let engagement = EngagementCounts {
            views: counter(id, "views", row.views)?,
            likes: counter(id, "likes", row.likes)?,
            comments: counter(id, "comments", row.comments)?,
            shares: counter(id, "shares", row.shares)?,
        };

        Ok(Self {
            id,
            product_id: row.product_id,
            campaign_id: row.campaign_id,
            format,
            title: row.title,
            body: row.body,
            status,
            archived: row.archived,
            scheduled_for: row.scheduled_for,
            posted_at: row.posted_at,
            rating,
            engagement,
            engagement_logged_at: row.engagement_logged_at,
            created_at: row.created_at,
        })
    }
}

/// The lifecycle columns of one piece, read for bulk planning.
#[derive(Debug, Clone, sqlx::FromRow)]
struct PieceStateRow {
    id: Uuid,
    status: String,
    archived: bool,
    scheduled_for: Option<DateTime<Utc>>,
    posted_at: Option<DateTime<Utc>>,
}

pub(crate) fn parse_status(id: Uuid, status: &str) -> Result<ContentStatus, DbError> {
    status
        .parse::<ContentStatus>()
        .map_err(|e| DbError::InvalidRow {
            id,
            reason: e.to_string(),
        })
}

pub(crate) fn counter(id: Uuid, name: &str, value: Option<i32>) -> Result<Option<u32>, DbError> {
    value
        .map(u32::try_from)
        .transpose()
        .map_err(|_| DbError::InvalidRow {
            id,
            reason: format!("{name} is negative"),
        })
}

/// Columns for a freshly generated piece. New pieces always start as drafts.
#[derive(Debug, Clone)]
pub struct NewContentPiece<'a> {
    pub product_id: Uuid,
    pub campaign_id: Option<Uuid>,
    pub format: ContentFormat,
    pub title: &'a str,
    pub body: &'a str,
    pub rating: Option<Rating>,
    pub engagement: EngagementCounts,
}

/// Filters for [`list_content_pieces`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentListFilter {
    pub status: Option<ContentStatus>,
    pub include_archived: bool,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Inserts a draft piece and returns its generated id.
///
/// `engagement_logged_at` is set to `NOW()` when any counter is present.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_content_piece<'e>(
    executor: impl PgExecutor<'e>,
    piece: &NewContentPiece<'_>,
) -> Result<Uuid, DbError> {
    let id = Uuid::new_v4();
    let e = piece.engagement;
    let as_int = |v: Option<u32>| v.map(|n| i32::try_from(n).unwrap_or(i32::MAX));

    sqlx::query(
        "INSERT INTO content_pieces \
             (id, product_id, campaign_id, content_type, title, body, status, rating, \
              views, likes, comments, shares, engagement_logged_at) \
         VALUES ($1, $2, $3, $4, $5, $6, 'draft', $7, $8, $9, $10, $11, \
                 CASE WHEN $12 THEN NOW() END)",
    )
    .bind(id)
    .bind(piece.product_id)
    .bind(piece.campaign_id)
    .bind(piece.format.as_str())
    .bind(piece.title)
    .bind(piece.body)
    .bind(piece.rating.map(Rating::value))
    .bind(as_int(e.views))
    .bind(as_int(e.likes))
    .bind(as_int(e.comments))
    .bind(as_int(e.shares))
    .bind(!e.is_empty())
    .execute(executor)
    .await?;

    Ok(id)
}

/// Fetches a single piece by id, archived or not.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no piece has this id, [`DbError::InvalidRow`]
/// if the stored row cannot be decoded, or [`DbError::Sqlx`] if the query fails.
pub async fn get_content_piece<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> Result<ContentPiece, DbError> {
    let row = sqlx::query_as::<_, ContentPieceRow>(&format!(
        "SELECT {PIECE_COLUMNS} FROM content_pieces WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?
    .ok_or(DbError::NotFound)?;

    ContentPiece::try_from(row)
}

/// Keyset-paginated pieces for a product, newest first.
/// `cursor` is the `id` of the last seen piece (exclusive).
///
/// # Errors
///
/// Returns [`DbError::InvalidRow`] if a stored row cannot be decoded, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn list_content_pieces(
    pool: &PgPool,
    product_id: Uuid,
    filter: ContentListFilter,
    limit: i64,
    cursor: Option<Uuid>,
) -> Result<Vec<ContentPiece>, DbError> {
    let rows = sqlx::query_as::<_, ContentPieceRow>(&format!(
        "SELECT {PIECE_COLUMNS} \
         FROM content_pieces \
         WHERE product_id = $1 \
           AND ($2::TEXT IS NULL OR status = $2) \
           AND ($3 OR archived = false) \
           AND ($4::UUID IS NULL OR (created_at, id) < \
                (SELECT created_at, id FROM content_pieces WHERE id = $4)) \
         ORDER BY created_at DESC, id DESC \
         LIMIT $5"
    ))
    .bind(product_id)
    .bind(filter.status.map(ContentStatus::as_str))
    .bind(filter.include_archived)
    .bind(cursor)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(ContentPiece::try_from).collect()
}

/// Reads the lifecycle columns of every existing piece in `ids`.
/// Unknown ids are simply absent from the result.
///
/// # Errors
///
/// Returns [`DbError::InvalidRow`] if a stored status cannot be decoded, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_content_states(
    pool: &PgPool,
    ids: &[Uuid],
) -> Result<Vec<(Uuid, PieceState)>, DbError> {
    let rows = sqlx::query_as::<_, PieceStateRow>(
        "SELECT id, status, archived, scheduled_for, posted_at \
         FROM content_pieces \
         WHERE id = ANY($1)",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| {
            let status = parse_status(row.id, &row.status)?;
            Ok((
                row.id,
                PieceState {
                    status,
                    archived: row.archived,
                    scheduled_for: row.scheduled_for,
                    posted_at: row.posted_at,
                },
            ))
        })
        .collect()
}

/// Writes `to` only if the stored lifecycle columns still equal `expected`.
///
/// Returns `false` when another writer got there first (zero rows matched).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn write_lifecycle_state<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    expected: &PieceState,
    to: &PieceState,
) -> Result<bool, DbError> {
    let result = sqlx::query(
        "UPDATE content_pieces \
         SET status = $1, scheduled_for = $2, posted_at = $3, updated_at = NOW() \
         WHERE id = $4 \
           AND status = $5 \
           AND archived = false \
           AND scheduled_for IS NOT DISTINCT FROM $6 \
           AND posted_at IS NOT DISTINCT FROM $7",
    )
    .bind(to.status.as_str())
    .bind(to.scheduled_for)
    .bind(to.posted_at)
    .bind(id)
    .bind(expected.status.as_str())
    .bind(expected.scheduled_for)
    .bind(expected.posted_at)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Sets the archived flag without touching status or timestamps.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no piece has this id, or
/// [`DbError::Sqlx`] if the update fails.
pub(crate) async fn update_archived<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    archived: bool,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE content_pieces \
         SET archived = $1, updated_at = NOW() \
         WHERE id = $2",
    )
    .bind(archived)
    .bind(id)
    .execute(executor)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
