//! Usage classification endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use stellark_common::api::{
    BatchClassifyRequest, BatchClassifyResponse, ClassifyUsageRequest, ClassifyUsageResponse,
    RecommendationsRequest, RecommendationsResponse, UsageChecksResponse,
};
use stellark_common::db::{list_usage_checks, record_usage_check};
use stellark_common::{classify, classify_multiple, recommendations};
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// POST /api/classify-usage
///
/// Classifies one usage against a rights schema. When `ipAssetId` is supplied the
/// verdict is stored so it can be listed later.
pub async fn classify_usage(
    State(state): State<AppState>,
    payload: Result<Json<ClassifyUsageRequest>, JsonRejection>,
) -> ApiResult<Json<ClassifyUsageResponse>> {
    let Json(request) = payload?;
    let (schema, context) = request.validate()?;

    let result = classify(schema, &context);
    info!(
        domain = %context.domain,
        use_type = %context.use_type,
        classification = %result.classification,
        "Classified usage"
    );

    if let Some(ip_asset_id) = request.ip_asset_id() {
        let check = record_usage_check(&state.db, ip_asset_id, &context, &result)
            .await
            .map_err(|e| ApiError::internal("Failed to classify usage", e))?;
        debug!(guid = %check.guid, ip_asset_id, "Stored usage check");
    }

    Ok(Json(ClassifyUsageResponse {
        recommendations: recommendations(schema),
        result,
    }))
}

/// POST /api/classify-usage/recommendations
pub async fn get_recommendations(
    payload: Result<Json<RecommendationsRequest>, JsonRejection>,
) -> ApiResult<Json<RecommendationsResponse>> {
    let Json(request) = payload?;
    let schema = request.validate()?;

    Ok(Json(RecommendationsResponse {
        recommendations: recommendations(schema),
    }))
}

/// POST /api/classify-usage/batch
pub async fn classify_batch(
    payload: Result<Json<BatchClassifyRequest>, JsonRejection>,
) -> ApiResult<Json<BatchClassifyResponse>> {
    let Json(request) = payload?;
    let (schema, contexts) = request.validate()?;

    let results = classify_multiple(schema, &contexts);
    let violations = results.iter().filter(|a| a.result.is_violation()).count();
    info!(total = results.len(), violations, "Classified usage batch");

    Ok(Json(BatchClassifyResponse { results }))
}

/// GET /api/usage-checks/:ip_asset_id
pub async fn get_usage_checks(
    State(state): State<AppState>,
    Path(ip_asset_id): Path<String>,
) -> ApiResult<Json<UsageChecksResponse>> {
    let checks = list_usage_checks(&state.db, &ip_asset_id)
        .await
        .map_err(|e| ApiError::internal("Failed to load usage checks", e))?;

    Ok(Json(UsageChecksResponse { ip_asset_id, checks }))
}
