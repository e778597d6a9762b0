//! Database operations for `avatars` and `campaigns`.

use adforge_core::{Avatar, Campaign, ChannelCategory, ContentFormat};
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `avatars` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AvatarRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub pain_points: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<AvatarRow> for Avatar {
    fn from(row: AvatarRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            name: row.name,
            pain_points: row.pain_points,
            created_at: row.created_at,
        }
    }
}

/// A row from the `campaigns` table. `content_type` and `category` are
/// checked against their enums on conversion.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CampaignRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub avatar_id: Uuid,
    pub angle: String,
    pub channel: String,
    pub hook: String,
    pub content_type: String,
    pub category: String,
    pub destination_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<CampaignRow> for Campaign {
    type Error = DbError;

    fn try_from(row: CampaignRow) -> Result<Self, Self::Error> {
        let invalid = |reason: String| DbError::InvalidRow { id: row.id, reason };
        let content_type = row
            .content_type
            .parse::<ContentFormat>()
            .map_err(|e| invalid(e.to_string()))?;
        let category = row
            .category
            .parse::<ChannelCategory>()
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            id: row.id,
            product_id: row.product_id,
            avatar_id: row.avatar_id,
            angle: row.angle,
            channel: row.channel,
            hook: row.hook,
            content_type,
            category,
            destination_url: row.destination_url,
            created_at: row.created_at,
        })
    }
}

/// Columns for a new campaign.
#[derive(Debug, Clone)]
pub struct NewCampaign<'a> {
    pub product_id: Uuid,
    pub avatar_id: Uuid,
    pub angle: &'a str,
    pub channel: &'a str,
    pub hook: &'a str,
    pub content_type: ContentFormat,
    pub category: ChannelCategory,
    pub destination_url: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// avatars
// ---------------------------------------------------------------------------

/// Inserts an avatar and returns its generated id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_avatar<'e>(
    executor: impl PgExecutor<'e>,
    product_id: Uuid,
    name: &str,
    pain_points: &[String],
) -> Result<Uuid, DbError> {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO avatars (id, product_id, name, pain_points) \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(id)
    .bind(product_id)
    .bind(name)
    .bind(pain_points)
    .execute(executor)
    .await?;
    Ok(id)
}

/// Fetches an avatar by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no avatar has this id, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_avatar(pool: &PgPool, id: Uuid) -> Result<Avatar, DbError> {
    let row = sqlx::query_as::<_, AvatarRow>(
        "SELECT id, product_id, name, pain_points, created_at \
         FROM avatars \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;
    Ok(row.into())
}

// ---------------------------------------------------------------------------
// campaigns
// ---------------------------------------------------------------------------

/// Inserts a campaign and returns its generated id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_campaign<'e>(
    executor: impl PgExecutor<'e>,
    campaign: &NewCampaign<'_>,
) -> Result<Uuid, DbError> {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO campaigns \
             (id, product_id, avatar_id, angle, channel, hook, content_type, category, destination_url) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(id)
    .bind(campaign.product_id)
    .bind(campaign.avatar_id)
    .bind(campaign.angle)
    .bind(campaign.channel)
    .bind(campaign.hook)
    .bind(campaign.content_type.as_str())
    .bind(campaign.category.as_str())
    .bind(campaign.destination_url)
    .execute(executor)
    .await?;
    Ok(id)
}

/// Fetches a campaign by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no campaign has this id,
/// [`DbError::InvalidRow`] if its stored enums don't parse, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_campaign(pool: &PgPool, id: Uuid) -> Result<Campaign, DbError> {
    let row = sqlx::query_as::<_, CampaignRow>(
        "SELECT id, product_id, avatar_id, angle, channel, hook, content_type, category, \
                destination_url, created_at \
         FROM campaigns \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;
    Campaign::try_from(row)
}
