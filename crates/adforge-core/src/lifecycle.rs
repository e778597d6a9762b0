//! Content lifecycle state machine.
//!
//! Pure planning only: callers read the current [`PieceState`], ask for a
//! [`TransitionPlan`], and then write `plan.to` conditioned on `plan.from`
//! still being the stored state. Nothing here touches storage or the clock;
//! `now` is always passed in. Planned timestamps are truncated to whole
//! microseconds, the precision Postgres keeps.
//!
//! | From      | To        | Kind                  |
//! |-----------|-----------|-----------------------|
//! | draft     | approved  | `Approve`             |
//! | approved  | draft     | `ReturnToDraft`       |
//! | approved  | scheduled | `Schedule`            |
//! | scheduled | scheduled | `Reschedule`          |
//! | scheduled | approved  | `Unschedule`          |
//! | scheduled | posted    | `Post`                |
//! | posted    | scheduled | `UndoPost` (schedule kept)    |
//! | posted    | approved  | `UndoPost` (never scheduled)  |

use std::collections::HashSet;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content::{ContentPiece, ContentStatus};
use crate::roles::ActingRole;

/// The lifecycle-relevant columns of a content piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceState {
    pub status: ContentStatus,
    pub archived: bool,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub posted_at: Option<DateTime<Utc>>,
}

impl PieceState {
    /// State of a freshly generated piece.
    #[must_use]
    pub fn new_draft() -> Self {
        Self {
            status: ContentStatus::Draft,
            archived: false,
            scheduled_for: None,
            posted_at: None,
        }
    }
}

/// A requested status change. `scheduled_for` is only meaningful when the
/// target is `scheduled` and the piece is not currently posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub to: ContentStatus,
    #[serde(default)]
    pub scheduled_for: Option<DateTime<Utc>>,
}

impl TransitionRequest {
    #[must_use]
    pub fn to(to: ContentStatus) -> Self {
        Self {
            to,
            scheduled_for: None,
        }
    }

    #[must_use]
    pub fn schedule_at(at: DateTime<Utc>) -> Self {
        Self {
            to: ContentStatus::Scheduled,
            scheduled_for: Some(at),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    Approve,
    ReturnToDraft,
    Schedule,
    Reschedule,
    Unschedule,
    Post,
    UndoPost,
}

impl std::fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TransitionKind::Approve => "approve",
            TransitionKind::ReturnToDraft => "return_to_draft",
            TransitionKind::Schedule => "schedule",
            TransitionKind::Reschedule => "reschedule",
            TransitionKind::Unschedule => "unschedule",
            TransitionKind::Post => "post",
            TransitionKind::UndoPost => "undo_post",
        };
        f.write_str(s)
    }
}

/// A legal transition: the state it was planned against and the state to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionPlan {
    pub kind: TransitionKind,
    pub from: PieceState,
    pub to: PieceState,
}

/// Why a transition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    NotAllowed,
    Archived,
    MissingTimestamp,
    TimestampInPast,
    UnexpectedTimestamp,
    NoPriorSchedule,
    PriorScheduleExists,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RejectReason::NotAllowed => "transition is not allowed",
            RejectReason::Archived => "piece is archived",
            RejectReason::MissingTimestamp => "a scheduled_for timestamp is required",
            RejectReason::TimestampInPast => "scheduled_for must not be in the past",
            RejectReason::UnexpectedTimestamp => {
                "scheduled_for cannot be supplied for this transition"
            }
            RejectReason::NoPriorSchedule => "piece was never scheduled; undo to approved instead",
            RejectReason::PriorScheduleExists => {
                "piece has a prior schedule; undo to scheduled instead"
            }
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("cannot move content from {from} to {to}: {reason}")]
    InvalidTransition {
        from: ContentStatus,
        to: ContentStatus,
        reason: RejectReason,
    },
    #[error("role '{role}' may not {action}")]
    Forbidden {
        role: ActingRole,
        action: &'static str,
    },
}

/// Fail unless `role` may mutate content.
///
/// # Errors
///
/// Returns [`LifecycleError::Forbidden`] for read-only roles.
pub fn ensure_can_edit(role: ActingRole, action: &'static str) -> Result<(), LifecycleError> {
    if role.can_edit_content() {
        Ok(())
    } else {
        Err(LifecycleError::Forbidden { role, action })
    }
}

/// Plan a transition for one piece.
///
/// Returns `Ok(None)` when the piece is already in the requested
/// `draft`/`approved`/`posted` status (idempotent no-op).
///
/// # Errors
///
/// Returns [`LifecycleError::Forbidden`] for read-only roles and
/// [`LifecycleError::InvalidTransition`] when the table above forbids the move
/// or its precondition fails.
pub fn plan_transition(
    current: &PieceState,
    request: &TransitionRequest,
    role: ActingRole,
    now: DateTime<Utc>,
) -> Result<Option<TransitionPlan>, LifecycleError> {
    use ContentStatus::{Approved, Draft, Posted, Scheduled};

    ensure_can_edit(role, "transition content")?;

    let now = now.trunc_subsecs(6);
    let from = current.status;
    let to = request.to;
    let reject = |reason| LifecycleError::InvalidTransition { from, to, reason };

    if current.archived {
        return Err(reject(RejectReason::Archived));
    }

    let takes_timestamp = to == Scheduled && from != Posted;
    if request.scheduled_for.is_some() && !takes_timestamp {
        return Err(reject(RejectReason::UnexpectedTimestamp));
    }

    let (kind, next) = match (from, to) {
        (Draft, Draft) | (Approved, Approved) | (Posted, Posted) => return Ok(None),
        (Draft, Approved) => (TransitionKind::Approve, cleared(Approved, current)),
        (Approved, Draft) => (TransitionKind::ReturnToDraft, cleared(Draft, current)),
        (Scheduled, Approved) => (TransitionKind::Unschedule, cleared(Approved, current)),
        (Approved, Scheduled) | (Scheduled, Scheduled) => {
            let at = request
                .scheduled_for
                .ok_or_else(|| reject(RejectReason::MissingTimestamp))?
                .trunc_subsecs(6);
            if at < now {
                return Err(reject(RejectReason::TimestampInPast));
            }
            let kind = if from == Scheduled {
                TransitionKind::Reschedule
            } else {
                TransitionKind::Schedule
            };
            let next = PieceState {
                status: Scheduled,
                scheduled_for: Some(at),
                posted_at: None,
                ..*current
            };
            (kind, next)
        }
        (Scheduled, Posted) => {
            let next = PieceState {
                status: Posted,
                posted_at: Some(now),
                ..*current
            };
            (TransitionKind::Post, next)
        }
        (Posted, Scheduled) => {
            if current.scheduled_for.is_none() {
                return Err(reject(RejectReason::NoPriorSchedule));
            }
            let next = PieceState {
                status: Scheduled,
                posted_at: None,
                ..*current
            };
            (TransitionKind::UndoPost, next)
        }
        (Posted, Approved) => {
            if current.scheduled_for.is_some() {
                return Err(reject(RejectReason::PriorScheduleExists));
            }
            (TransitionKind::UndoPost, cleared(Approved, current))
        }
        _ => return Err(reject(RejectReason::NotAllowed)),
    };

    Ok(Some(TransitionPlan {
        kind,
        from: *current,
        to: next,
    }))
}

fn cleared(status: ContentStatus, current: &PieceState) -> PieceState {
    PieceState {
        status,
        scheduled_for: None,
        posted_at: None,
        ..*current
    }
}

/// Outcome of partitioning a bulk request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkPlan {
    pub planned: Vec<(Uuid, TransitionPlan)>,
    pub skipped: Vec<Uuid>,
}

/// Split a batch into pieces whose current state permits the request and
/// everything else. Illegal, archived and already-in-state pieces land in
/// `skipped`; none of them fail the batch. Repeated ids are considered once.
///
/// # Errors
///
/// Returns [`LifecycleError::Forbidden`] if `role` may not edit content.
pub fn partition_bulk<'a, I>(
    pieces: I,
    request: &TransitionRequest,
    role: ActingRole,
    now: DateTime<Utc>,
) -> Result<BulkPlan, LifecycleError>
where
    I: IntoIterator<Item = (Uuid, &'a PieceState)>,
{
    ensure_can_edit(role, "transition content")?;

    let mut seen = HashSet::new();
    let mut plan = BulkPlan::default();

    for (id, state) in pieces {
        if !seen.insert(id) {
            continue;
        }
        match plan_transition(state, request, role, now) {
            Ok(Some(p)) => plan.planned.push((id, p)),
            Ok(None) | Err(_) => plan.skipped.push(id),
        }
    }

    Ok(plan)
}

impl ContentPiece {
    /// Write a plan's target state onto an in-memory piece.
    pub fn apply_plan(&mut self, plan: &TransitionPlan) {
        self.status = plan.to.status;
        self.scheduled_for = plan.to.scheduled_for;
        self.posted_at = plan.to.posted_at;
    }
}

#[cfg(test)]
#[path = "lifecycle_test.rs"]
mod tests;
