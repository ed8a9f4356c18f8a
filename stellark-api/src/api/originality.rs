//! Originality verification endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use reqwest::Url;
use stellark_common::api::{VerifyOriginalityRequest, VerifyOriginalityResponse};
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// POST /api/verify-originality
pub async fn verify_originality(
    State(state): State<AppState>,
    payload: Result<Json<VerifyOriginalityRequest>, JsonRejection>,
) -> ApiResult<Json<VerifyOriginalityResponse>> {
    let Json(request) = payload?;
    let media_url = Url::parse(request.media_url()?)
        .map_err(|_| ApiError::BadRequest("mediaUrl must be a valid URL".to_string()))?;

    let report = state.verifier.verify(&media_url).await.map_err(|e| {
        warn!(%media_url, "Originality verification failed: {}", e);
        ApiError::internal("Failed to verify originality", e)
    })?;
    info!(
        %media_url,
        matches = report.matches.len(),
        score = report.originality_score,
        "Verified originality"
    );

    Ok(Json(VerifyOriginalityResponse {
        report,
        note: state.verifier.note().map(str::to_string),
    }))
}
