use adforge_core::{ActingRole, ContentStatus, TransitionRequest};
use adforge_db::TransitionOutcome;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Move one piece and report what happened.
///
/// # Errors
///
/// Returns an error if the role may not edit content, the move is illegal
/// from the stored state, the piece does not exist, or a query fails.
pub(crate) async fn run_content_transition(
    pool: &sqlx::PgPool,
    role: ActingRole,
    id: Uuid,
    to: ContentStatus,
    at: Option<DateTime<Utc>>,
) -> anyhow::Result<()> {
    let request = TransitionRequest {
        to,
        scheduled_for: at,
    };
    let outcome =
        adforge_db::transition_content_piece(pool, id, &request, role, Utc::now()).await?;

    println!("{}", outcome_line(&outcome));
    let piece = outcome.piece();
    if piece.status == ContentStatus::Scheduled {
        println!("  scheduled for {}", super::fmt_time(piece.scheduled_for));
    }

    Ok(())
}

/// One line per outcome. A lost race is reported, not treated as a failure.
fn outcome_line(outcome: &TransitionOutcome) -> String {
    match outcome {
        TransitionOutcome::Applied { kind, piece } => {
            format!("{}: {kind} \u{2192} {}", piece.id, piece.status)
        }
        TransitionOutcome::Unchanged { piece } => format!("{}: already {}", piece.id, piece.status),
        TransitionOutcome::Stale { piece } => format!(
            "{}: changed by another writer; now {}, nothing applied",
            piece.id, piece.status
        ),
    }
}

/// Move many pieces; the rest are listed as skipped.
///
/// # Errors
///
/// Returns an error if the role may not edit content or a query fails.
pub(crate) async fn run_content_bulk(
    pool: &sqlx::PgPool,
    role: ActingRole,
    ids: &[Uuid],
    to: ContentStatus,
    at: Option<DateTime<Utc>>,
) -> anyhow::Result<()> {
    let request = TransitionRequest {
        to,
        scheduled_for: at,
    };
    let result = adforge_db::bulk_transition(pool, ids, &request, role, Utc::now()).await?;

    println!(
        "{} applied, {} skipped (target {to})",
        result.applied_count(),
        result.skipped_count()
    );
    for id in &result.skipped {
        println!("  skipped {id}");
    }

    Ok(())
}

/// Set or clear the archived flag.
///
/// # Errors
///
/// Returns an error if the role may not edit content, the piece does not
/// exist, or a query fails.
pub(crate) async fn run_content_archive(
    pool: &sqlx::PgPool,
    role: ActingRole,
    id: Uuid,
    archived: bool,
) -> anyhow::Result<()> {
    let piece = adforge_db::set_archived(pool, id, archived, role).await?;
    let verb = if piece.archived { "archived" } else { "unarchived" };
    println!("{id}: {verb} (status {})", piece.status);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use adforge_core::{ContentFormat, ContentPiece, EngagementCounts, TransitionKind};

    fn piece(status: ContentStatus) -> ContentPiece {
        ContentPiece {
            id: Uuid::nil(),
            product_id: Uuid::nil(),
            campaign_id: None,
            format: ContentFormat::Post,
            title: "Why your lamp keeps you awake".to_string(),
            body: String::new(),
            status,
            archived: false,
            scheduled_for: None,
            posted_at: None,
            rating: None,
            engagement: EngagementCounts::default(),
            engagement_logged_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn stale_outcome_reports_current_status() {
        let line = outcome_line(&TransitionOutcome::Stale {
            piece: piece(ContentStatus::Scheduled),
        });
        assert_eq!(
            line,
            format!("{}: changed by another writer; now scheduled, nothing applied", Uuid::nil())
        );
    }

    #[test]
    fn applied_and_unchanged_lines() {
        let applied = outcome_line(&TransitionOutcome::Applied {
            kind: TransitionKind::Approve,
            piece: piece(ContentStatus::Approved),
        });
        assert!(applied.ends_with("\u{2192} approved"), "{applied}");

        let unchanged = outcome_line(&TransitionOutcome::Unchanged {
            piece: piece(ContentStatus::Draft),
        });
        assert!(unchanged.ends_with("already draft"), "{unchanged}");
    }
}
