use adforge_core::ActingRole;
use adforge_insights::{InsightsReport, PerformanceReport};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_report_error, parse_id, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(in crate::api) struct PerformanceQuery {
    #[serde(default)]
    pub include_archived: bool,
}

pub(in crate::api) async fn get_performance(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(role): Extension<ActingRole>,
    Path(product_id): Path<String>,
    Query(query): Query<PerformanceQuery>,
) -> Result<Json<ApiResponse<PerformanceReport>>, ApiError> {
    let product_id = parse_id(&req_id.0, &product_id, "product_id")?;
    let report =
        adforge_insights::performance_report(&state.pool, product_id, role, query.include_archived)
            .await
            .map_err(|e| map_report_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::ok(req_id.0, report))
}

pub(in crate::api) async fn get_insights(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(role): Extension<ActingRole>,
    Path(product_id): Path<String>,
) -> Result<Json<ApiResponse<InsightsReport>>, ApiError> {
    let product_id = parse_id(&req_id.0, &product_id, "product_id")?;
    let report = adforge_insights::insights_report(&state.pool, product_id, role)
        .await
        .map_err(|e| map_report_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::ok(req_id.0, report))
}
