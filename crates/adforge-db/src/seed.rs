use std::collections::HashMap;

use adforge_core::SeedFile;
use sqlx::PgPool;
use uuid::Uuid;

use crate::campaigns::{insert_avatar, insert_campaign, NewCampaign};
use crate::content_pieces::{insert_content_piece, NewContentPiece};
use crate::products::insert_product;
use crate::tracked_links::{insert_tracked_link, NewTrackedLink};
use crate::DbError;

/// What a seed run inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub product_id: Uuid,
    pub avatars: usize,
    pub campaigns: usize,
    pub content_pieces: usize,
    pub links: usize,
}

/// Insert one seed file as a new product with its avatars, campaigns,
/// draft content and tracked links.
///
/// Everything runs inside a single transaction; if any insert fails the
/// whole seed is rolled back. Seed keys are resolved to generated ids in
/// file order, so the file must already be validated.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if a key reference cannot be resolved, or
/// [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_product(pool: &PgPool, seed: &SeedFile) -> Result<SeedSummary, DbError> {
    let mut tx = pool.begin().await?;

    let product_id = insert_product(
        &mut *tx,
        &seed.product.name,
        seed.product.description.as_deref(),
    )
    .await?;

    let mut avatars: HashMap<&str, Uuid> = HashMap::new();
    for avatar in &seed.avatars {
        let id = insert_avatar(&mut *tx, product_id, &avatar.name, &avatar.pain_points).await?;
        avatars.insert(avatar.key.as_str(), id);
    }

    let mut campaigns: HashMap<&str, Uuid> = HashMap::new();
    for campaign in &seed.campaigns {
        let avatar_id = *avatars
            .get(campaign.avatar.as_str())
            .ok_or(DbError::NotFound)?;
        let id = insert_campaign(
            &mut *tx,
            &NewCampaign {
                product_id,
                avatar_id,
                angle: &campaign.angle,
                channel: &campaign.channel,
                hook: &campaign.hook,
                content_type: campaign.content_type,
                category: campaign.category,
                destination_url: campaign.destination_url.as_deref(),
            },
        )
        .await?;
        campaigns.insert(campaign.key.as_str(), id);
    }

    let mut pieces: HashMap<&str, Uuid> = HashMap::new();
    for piece in &seed.content {
        let campaign_id = piece
            .campaign
            .as_deref()
            .map(|key| campaigns.get(key).copied().ok_or(DbError::NotFound))
            .transpose()?;
        let id = insert_content_piece(
            &mut *tx,
            &NewContentPiece {
                product_id,
                campaign_id,
                format: piece.format,
                title: &piece.title,
                body: &piece.body,
                rating: piece.rating,
                engagement: piece.engagement,
            },
        )
        .await?;
        if let Some(ref key) = piece.key {
            pieces.insert(key.as_str(), id);
        }
    }

    for link in &seed.links {
        let campaign_id = link
            .campaign
            .as_deref()
            .map(|key| campaigns.get(key).copied().ok_or(DbError::NotFound))
            .transpose()?;
        let content_piece_id = link
            .content
            .as_deref()
            .map(|key| pieces.get(key).copied().ok_or(DbError::NotFound))
            .transpose()?;
        insert_tracked_link(
            &mut *tx,
            &NewTrackedLink {
                slug: &link.slug,
                destination_url: &link.destination_url,
                campaign_id,
                content_piece_id,
                click_count: link.click_count,
            },
        )
        .await?;
    }

    tx.commit().await?;

    let summary = SeedSummary {
        product_id,
        avatars: seed.avatars.len(),
        campaigns: seed.campaigns.len(),
        content_pieces: seed.content.len(),
        links: seed.links.len(),
    };
    tracing::info!(
        product = %product_id,
        avatars = summary.avatars,
        campaigns = summary.campaigns,
        content_pieces = summary.content_pieces,
        links = summary.links,
        "seed inserted"
    );
    Ok(summary)
}
