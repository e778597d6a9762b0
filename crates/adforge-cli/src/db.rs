use std::path::Path;

pub(crate) async fn run_db_ping(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    adforge_db::ping(pool).await?;
    println!("database reachable");
    Ok(())
}

pub(crate) async fn run_db_migrate(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let applied = adforge_db::run_migrations(pool).await?;
    println!("migrations applied: {applied}");
    Ok(())
}

/// Load, validate and insert a seed file in one transaction.
///
/// # Errors
///
/// Returns an error if the file cannot be read or validated, or if any
/// insert fails (nothing is written in that case).
pub(crate) async fn run_db_seed(pool: &sqlx::PgPool, path: &Path) -> anyhow::Result<()> {
    let seed = adforge_core::load_seed(path)?;
    let summary = adforge_db::seed_product(pool, &seed).await?;

    println!("seeded product {} ({})", seed.product.name, summary.product_id);
    println!(
        "  {} avatars, {} campaigns, {} content pieces, {} links",
        summary.avatars, summary.campaigns, summary.content_pieces, summary.links
    );
    Ok(())
}
