//! License parsing endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use stellark_common::api::{ParseLicenseRequest, ParseLicenseResponse};
use stellark_common::db::{load_parsed_license, record_parsed_license, ParsedLicenseRecord};
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::services::parse_license;
use crate::AppState;

/// POST /api/parse-license
///
/// Interpretation problems never fail the request; they lower the confidence.
pub async fn parse_license_text(
    State(state): State<AppState>,
    payload: Result<Json<ParseLicenseRequest>, JsonRejection>,
) -> ApiResult<Json<ParseLicenseResponse>> {
    let Json(request) = payload?;
    let license_text = request.validate()?;

    let parsed = parse_license(license_text, state.interpreter.as_deref()).await;

    let record = record_parsed_license(&state.db, license_text, &parsed)
        .await
        .map_err(|e| ApiError::internal("Failed to parse license", e))?;
    info!(guid = %record.guid, confidence = parsed.confidence, "Parsed license text");

    Ok(Json(ParseLicenseResponse {
        id: record.guid,
        parsed,
    }))
}

/// GET /api/parsed-licenses/:id
pub async fn get_parsed_license(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ParsedLicenseRecord>> {
    let guid = Uuid::parse_str(&id)
        .map_err(|_| ApiError::BadRequest(format!("Invalid parsed license id: {}", id)))?;

    load_parsed_license(&state.db, guid)
        .await
        .map_err(|e| ApiError::internal("Failed to load parsed license", e))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Parsed license not found: {}", guid)))
}
