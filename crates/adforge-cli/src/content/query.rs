use adforge_core::ContentStatus;
use adforge_db::ContentListFilter;
use uuid::Uuid;

/// Print a product's content as a table.
///
/// # Errors
///
/// Returns an error if the product does not exist or a query fails.
pub(crate) async fn run_content_list(
    pool: &sqlx::PgPool,
    product_id: Uuid,
    status: Option<ContentStatus>,
    include_archived: bool,
    limit: i64,
) -> anyhow::Result<()> {
    let product = adforge_db::get_product(pool, product_id)
        .await
        .map_err(|e| anyhow::anyhow!("product {product_id}: {e}"))?;
    let pieces = adforge_db::list_content_pieces(
        pool,
        product_id,
        ContentListFilter {
            status,
            include_archived,
        },
        limit.clamp(1, 200),
        None,
    )
    .await?;

    if pieces.is_empty() {
        println!("no content found for {}", product.name);
        return Ok(());
    }

    println!(
        "{:<38}{:<8}{:<11}{:<18}TITLE",
        "ID", "TYPE", "STATUS", "SCHEDULED"
    );
    for piece in &pieces {
        let status = if piece.archived {
            format!("{}*", piece.status)
        } else {
            piece.status.to_string()
        };
        println!(
            "{:<38}{:<8}{:<11}{:<18}{}",
            piece.id,
            piece.format,
            status,
            super::fmt_time(piece.scheduled_for),
            super::truncate(&piece.title, 50)
        );
    }
    if include_archived {
        println!();
        println!("* archived");
    }

    Ok(())
}

/// Print one piece in full with its campaign context and tracked links.
///
/// # Errors
///
/// Returns an error if the piece does not exist or a query fails.
pub(crate) async fn run_content_show(pool: &sqlx::PgPool, id: Uuid) -> anyhow::Result<()> {
    let piece = adforge_db::get_content_piece(pool, id)
        .await
        .map_err(|e| anyhow::anyhow!("content piece {id}: {e}"))?;
    let links = adforge_db::list_links_for_piece(pool, id).await?;
    let campaign = match piece.campaign_id {
        Some(campaign_id) => Some(adforge_db::get_campaign(pool, campaign_id).await?),
        None => None,
    };
    let avatar = match &campaign {
        Some(c) => Some(adforge_db::get_avatar(pool, c.avatar_id).await?),
        None => None,
    };

    println!("{} \u{2014} {}", piece.title, piece.format);
    println!("Status:    {}{}", piece.status, if piece.archived { " (archived)" } else { "" });
    println!("Scheduled: {}", super::fmt_time(piece.scheduled_for));
    println!("Posted:    {}", super::fmt_time(piece.posted_at));
    println!(
        "Rating:    {}",
        piece
            .rating
            .map_or_else(|| "\u{2014}".to_string(), |r| r.value().to_string())
    );

    if let Some(c) = &campaign {
        println!("Campaign:  {} on {} ({})", c.angle, c.channel, c.category);
        println!("Hook:      {}", c.hook);
    }
    if let Some(a) = &avatar {
        println!("Avatar:    {} [{}]", a.name, a.pain_points.join(", "));
    }

    let e = piece.engagement;
    if !e.is_empty() {
        let n = |v: Option<u32>| v.map_or_else(|| "\u{2014}".to_string(), |v| v.to_string());
        println!(
            "Engagement: {} views, {} likes, {} comments, {} shares",
            n(e.views),
            n(e.likes),
            n(e.comments),
            n(e.shares)
        );
    }

    println!();
    println!("{}", piece.body);

    if !links.is_empty() {
        println!();
        println!("{:<24}{:<8}DESTINATION", "SLUG", "CLICKS");
        for link in &links {
            println!(
                "{:<24}{:<8}{}",
                link.slug, link.click_count, link.destination_url
            );
        }
    }

    Ok(())
}
