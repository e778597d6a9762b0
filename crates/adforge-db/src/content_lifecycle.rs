//! Executes lifecycle plans against the store.
//!
//! Every write is conditioned on the state it was planned against, so two
//! concurrent transitions of the same piece cannot both apply.

use std::collections::{HashMap, HashSet};

use adforge_core::{
    ensure_can_edit, partition_bulk, plan_transition, ActingRole, BulkPlan, ContentPiece,
    PieceState, TransitionKind, TransitionPlan, TransitionRequest,
};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::content_pieces::{
    get_content_piece, get_content_states, update_archived, write_lifecycle_state,
};
use crate::DbError;

/// Result of a single-piece transition. Every variant carries the piece as
/// it is stored after the call.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOutcome {
    Applied {
        kind: TransitionKind,
        piece: ContentPiece,
    },
    /// The piece was already in the requested status.
    Unchanged { piece: ContentPiece },
    /// Another writer changed the piece between read and write.
    Stale { piece: ContentPiece },
}

impl TransitionOutcome {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionOutcome::Applied { .. } => "applied",
            TransitionOutcome::Unchanged { .. } => "unchanged",
            TransitionOutcome::Stale { .. } => "stale",
        }
    }

    #[must_use]
    pub fn piece(&self) -> &ContentPiece {
        match self {
            TransitionOutcome::Applied { piece, .. }
            | TransitionOutcome::Unchanged { piece }
            | TransitionOutcome::Stale { piece } => piece,
        }
    }

    #[must_use]
    pub fn into_piece(self) -> ContentPiece {
        match self {
            TransitionOutcome::Applied { piece, .. }
            | TransitionOutcome::Unchanged { piece }
            | TransitionOutcome::Stale { piece } => piece,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkTransitionResult {
    pub applied: Vec<Uuid>,
    pub skipped: Vec<Uuid>,
}

impl BulkTransitionResult {
    #[must_use]
    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }

    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Move one piece to the requested status.
///
/// # Errors
///
/// Returns [`DbError::Lifecycle`] when the role may not edit or the move is
/// illegal from the stored state, [`DbError::NotFound`] for an unknown id, or
/// [`DbError::Sqlx`] if a query fails.
pub async fn transition_content_piece(
    pool: &PgPool,
    id: Uuid,
    request: &TransitionRequest,
    role: ActingRole,
    now: DateTime<Utc>,
) -> Result<TransitionOutcome, DbError> {
    ensure_can_edit(role, "transition content")?;

    let piece = get_content_piece(pool, id).await?;
    let Some(plan) = plan_transition(&piece.lifecycle_state(), request, role, now)? else {
        tracing::debug!(piece = %id, status = %piece.status, "content already in requested status");
        return Ok(TransitionOutcome::Unchanged { piece });
    };

    let outcome = apply_transition_plan(pool, piece, &plan).await?;
    if let TransitionOutcome::Applied { kind, .. } = &outcome {
        tracing::info!(
            piece = %id,
            from = %plan.from.status,
            to = %plan.to.status,
            kind = %kind,
            role = %role,
            "content transition applied"
        );
    }
    Ok(outcome)
}

/// Write a plan made against `piece`. If the stored row no longer matches
/// `plan.from` nothing is written and the current row comes back as
/// [`TransitionOutcome::Stale`].
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the piece vanished, or [`DbError::Sqlx`]
/// if a query fails.
pub async fn apply_transition_plan(
    pool: &PgPool,
    mut piece: ContentPiece,
    plan: &TransitionPlan,
) -> Result<TransitionOutcome, DbError> {
    let id = piece.id;
    if write_lifecycle_state(pool, id, &plan.from, &plan.to).await? {
        piece.apply_plan(plan);
        Ok(TransitionOutcome::Applied {
            kind: plan.kind,
            piece,
        })
    } else {
        tracing::warn!(piece = %id, to = %plan.to.status, "content changed concurrently; transition not applied");
        let piece = get_content_piece(pool, id).await?;
        Ok(TransitionOutcome::Stale { piece })
    }
}

/// Apply one request to many pieces. Pieces whose state doesn't permit it,
/// archived pieces, unknown ids and lost races are skipped. Each write is
/// independent; a failure part-way leaves earlier writes in place.
///
/// # Errors
///
/// Returns [`DbError::Lifecycle`] if the role may not edit content, or
/// [`DbError::Sqlx`] if a query fails.
pub async fn bulk_transition(
    pool: &PgPool,
    ids: &[Uuid],
    request: &TransitionRequest,
    role: ActingRole,
    now: DateTime<Utc>,
) -> Result<BulkTransitionResult, DbError> {
    ensure_can_edit(role, "transition content")?;

    let mut result = BulkTransitionResult::default();
    if ids.is_empty() {
        return Ok(result);
    }

    let states: HashMap<Uuid, PieceState> =
        get_content_states(pool, ids).await?.into_iter().collect();

    let mut seen = HashSet::new();
    let mut known = Vec::new();
    for id in ids {
        if !seen.insert(*id) {
            continue;
        }
        match states.get(id) {
            Some(state) => known.push((*id, state)),
            None => result.skipped.push(*id),
        }
    }

    let plan = partition_bulk(known, request, role, now)?;
    let written = apply_bulk_plan(pool, plan).await?;
    result.applied = written.applied;
    result.skipped.extend(written.skipped);

    tracing::info!(
        to = %request.to,
        requested = ids.len(),
        applied = result.applied_count(),
        skipped = result.skipped_count(),
        role = %role,
        "bulk content transition finished"
    );

    Ok(result)
}

/// Write every planned piece of a partitioned batch. Pieces skipped by the
/// plan stay skipped; pieces whose row changed since planning are skipped too.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if a query fails.
pub async fn apply_bulk_plan(
    pool: &PgPool,
    plan: BulkPlan,
) -> Result<BulkTransitionResult, DbError> {
    let mut result = BulkTransitionResult {
        applied: Vec::new(),
        skipped: plan.skipped,
    };
    for (id, piece_plan) in plan.planned {
        if write_lifecycle_state(pool, id, &piece_plan.from, &piece_plan.to).await? {
            result.applied.push(id);
        } else {
            tracing::debug!(piece = %id, "content changed concurrently; skipped in bulk");
            result.skipped.push(id);
        }
    }
    Ok(result)
}

/// Set or clear the archived flag and return the stored piece.
///
/// # Errors
///
/// Returns [`DbError::Lifecycle`] if the role may not edit content,
/// [`DbError::NotFound`] for an unknown id, or [`DbError::Sqlx`] if a query
/// fails.
pub async fn set_archived(
    pool: &PgPool,
    id: Uuid,
    archived: bool,
    role: ActingRole,
) -> Result<ContentPiece, DbError> {
    ensure_can_edit(role, "archive content")?;

    update_archived(pool, id, archived).await?;
    tracing::info!(piece = %id, archived, role = %role, "content archive flag updated");

    get_content_piece(pool, id).await
}
