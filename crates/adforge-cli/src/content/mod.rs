//! Content command handlers for the CLI.
//!
//! `list` and `show` are read-only; the remaining subcommands go through the
//! lifecycle state machine and write only when the move is legal.

mod lifecycle;
mod query;

use adforge_core::{ActingRole, ContentStatus};
use chrono::{DateTime, Utc};
use clap::Subcommand;
use uuid::Uuid;

pub(crate) use lifecycle::{run_content_archive, run_content_bulk, run_content_transition};
pub(crate) use query::{run_content_list, run_content_show};

/// Sub-commands available under `content`.
#[derive(Debug, Subcommand)]
pub enum ContentCommands {
    /// List a product's content, newest first
    List {
        /// Product id
        #[arg(long)]
        product: Uuid,
        /// Only show pieces in this status
        #[arg(long)]
        status: Option<ContentStatus>,
        /// Include archived pieces
        #[arg(long)]
        include_archived: bool,
        /// Maximum number of pieces to show
        #[arg(long, default_value = "50")]
        limit: i64,
    },
    /// Show one piece with its tracked links
    Show { id: Uuid },
    /// Move one piece to a new status
    Transition {
        id: Uuid,
        /// Target status
        #[arg(long)]
        to: ContentStatus,
        /// Publish time (RFC 3339) when scheduling
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Move many pieces to a new status; pieces that cannot move are skipped
    Bulk {
        /// Target status
        #[arg(long)]
        to: ContentStatus,
        /// Publish time (RFC 3339) when scheduling
        #[arg(long)]
        at: Option<DateTime<Utc>>,
        #[arg(required = true)]
        ids: Vec<Uuid>,
    },
    /// Hide a piece from active views
    Archive { id: Uuid },
    /// Return an archived piece to active views
    Unarchive { id: Uuid },
}

pub(crate) async fn run(
    pool: &sqlx::PgPool,
    role: ActingRole,
    command: ContentCommands,
) -> anyhow::Result<()> {
    match command {
        ContentCommands::List {
            product,
            status,
            include_archived,
            limit,
        } => run_content_list(pool, product, status, include_archived, limit).await,
        ContentCommands::Show { id } => run_content_show(pool, id).await,
        ContentCommands::Transition { id, to, at } => {
            run_content_transition(pool, role, id, to, at).await
        }
        ContentCommands::Bulk { to, at, ids } => run_content_bulk(pool, role, &ids, to, at).await,
        ContentCommands::Archive { id } => run_content_archive(pool, role, id, true).await,
        ContentCommands::Unarchive { id } => run_content_archive(pool, role, id, false).await,
    }
}

/// Format an optional timestamp for display, returning `"—"` when `None`.
fn fmt_time(time: Option<DateTime<Utc>>) -> String {
    time.map_or_else(
        || "\u{2014}".to_string(),
        |t| t.format("%Y-%m-%d %H:%M").to_string(),
    )
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}
