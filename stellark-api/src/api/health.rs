//! Health check and service descriptor endpoints

use axum::{routing::get, Json, Router};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use stellark_common::api::HealthResponse;

use crate::AppState;

/// GET /health
///
/// Liveness probe; never touches the database.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /
pub async fn service_descriptor() -> Json<Value> {
    Json(json!({
        "name": "Stellark Rights API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Usage-rights classification for registered IP assets",
        "endpoints": {
            "health": "GET /health",
            "buildInfo": "GET /api/buildinfo",
            "classifyUsage": "POST /api/classify-usage",
            "recommendations": "POST /api/classify-usage/recommendations",
            "batchClassify": "POST /api/classify-usage/batch",
            "usageChecks": "GET /api/usage-checks/:ip_asset_id",
            "parseLicense": "POST /api/parse-license",
            "parsedLicense": "GET /api/parsed-licenses/:id",
            "verifyOriginality": "POST /api/verify-originality"
        }
    }))
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(service_descriptor))
        .route("/health", get(health_check))
}
