//! Content listing, lifecycle transitions and archive toggling.

use adforge_core::{ActingRole, ContentPiece, ContentStatus, TransitionKind, TransitionRequest};
use adforge_db::{ContentListFilter, TransitionOutcome};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, parse_id, ApiError, ApiResponse, AppState};

/// Upper bound on ids accepted by one bulk request.
const MAX_BULK_IDS: usize = 500;

#[derive(Debug, Deserialize)]
pub(in crate::api) struct ContentListQuery {
    pub status: Option<String>,
    #[serde(default)]
    pub include_archived: bool,
    pub limit: Option<i64>,
    pub cursor: Option<String>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct PaginatedContent {
    pub items: Vec<ContentPiece>,
    pub next_cursor: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct TransitionData {
    pub outcome: &'static str,
    pub kind: Option<TransitionKind>,
    pub piece: ContentPiece,
}

impl From<TransitionOutcome> for TransitionData {
    fn from(outcome: TransitionOutcome) -> Self {
        let label = outcome.as_str();
        let kind = match &outcome {
            TransitionOutcome::Applied { kind, .. } => Some(*kind),
            TransitionOutcome::Unchanged { .. } | TransitionOutcome::Stale { .. } => None,
        };
        Self {
            outcome: label,
            kind,
            piece: outcome.into_piece(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct BulkTransitionBody {
    pub to: ContentStatus,
    pub ids: Vec<Uuid>,
    #[serde(default)]
    pub scheduled_for: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct BulkTransitionData {
    pub applied: Vec<Uuid>,
    pub skipped: Vec<Uuid>,
    pub applied_count: usize,
    pub skipped_count: usize,
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct ArchiveBody {
    pub archived: bool,
}

pub(in crate::api) async fn list_content(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_id): Path<String>,
    Query(query): Query<ContentListQuery>,
) -> Result<Json<ApiResponse<PaginatedContent>>, ApiError> {
    let product_id = parse_id(&req_id.0, &product_id, "product_id")?;
    let status = query
        .status
        .as_deref()
        .map(str::parse::<ContentStatus>)
        .transpose()
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;
    let cursor = query
        .cursor
        .as_deref()
        .map(|raw| parse_id(&req_id.0, raw, "cursor"))
        .transpose()?;

    adforge_db::get_product(&state.pool, product_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e, "product"))?;

    let limit = normalize_limit(query.limit);
    let rows = adforge_db::list_content_pieces(
        &state.pool,
        product_id,
        ContentListFilter {
            status,
            include_archived: query.include_archived,
        },
        limit + 1, // fetch one extra to detect next page
        cursor,
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e, "product"))?;

    // `normalize_limit` clamps to 1..=200, so the conversion is always safe.
    let limit_usize = usize::try_from(limit).unwrap_or(usize::MAX);
    let has_more = rows.len() > limit_usize;
    let items: Vec<ContentPiece> = rows.into_iter().take(limit_usize).collect();
    let next_cursor = if has_more {
        items.last().map(|piece| piece.id)
    } else {
        None
    };

    Ok(ApiResponse::ok(req_id.0, PaginatedContent { items, next_cursor }))
}

pub(in crate::api) async fn get_content(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ContentPiece>>, ApiError> {
    let id = parse_id(&req_id.0, &id, "content id")?;
    let piece = adforge_db::get_content_piece(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e, "content piece"))?;

    Ok(ApiResponse::ok(req_id.0, piece))
}

pub(in crate::api) async fn transition_content(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(role): Extension<ActingRole>,
    Path(id): Path<String>,
    Json(request): Json<TransitionRequest>,
) -> Result<Json<ApiResponse<TransitionData>>, ApiError> {
    let id = parse_id(&req_id.0, &id, "content id")?;
    let outcome =
        adforge_db::transition_content_piece(&state.pool, id, &request, role, Utc::now())
            .await
            .map_err(|e| map_db_error(req_id.0.clone(), &e, "content piece"))?;

    Ok(ApiResponse::ok(req_id.0, TransitionData::from(outcome)))
}

pub(in crate::api) async fn bulk_transition(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(role): Extension<ActingRole>,
    Json(body): Json<BulkTransitionBody>,
) -> Result<Json<ApiResponse<BulkTransitionData>>, ApiError> {
    if body.ids.len() > MAX_BULK_IDS {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            format!("at most {MAX_BULK_IDS} ids per bulk request"),
        ));
    }

    let request = TransitionRequest {
        to: body.to,
        scheduled_for: body.scheduled_for,
    };
    let result = adforge_db::bulk_transition(&state.pool, &body.ids, &request, role, Utc::now())
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e, "content piece"))?;

    let applied_count = result.applied_count();
    let skipped_count = result.skipped_count();
    Ok(ApiResponse::ok(
        req_id.0,
        BulkTransitionData {
            applied: result.applied,
            skipped: result.skipped,
            applied_count,
            skipped_count,
        },
    ))
}

pub(in crate::api) async fn set_archived(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(role): Extension<ActingRole>,
    Path(id): Path<String>,
    Json(body): Json<ArchiveBody>,
) -> Result<Json<ApiResponse<ContentPiece>>, ApiError> {
    let id = parse_id(&req_id.0, &id, "content id")?;
    let piece = adforge_db::set_archived(&state.pool, id, body.archived, role)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e, "content piece"))?;

    Ok(ApiResponse::ok(req_id.0, piece))
}
