//! stellark-api library - usage-rights HTTP service
//!
//! Exposes the classification engine, license parsing and originality
//! verification over JSON. Handlers validate at the boundary and hand typed
//! values to `stellark_common`.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod services;

pub use error::{ApiError, ApiResult};

use services::{LicenseInterpreter, OriginalityVerifier};

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Usage check and parsed license store
    pub db: SqlitePool,
    /// License interpreter; `None` when no API key is configured
    pub interpreter: Option<Arc<dyn LicenseInterpreter>>,
    pub verifier: Arc<dyn OriginalityVerifier>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        interpreter: Option<Arc<dyn LicenseInterpreter>>,
        verifier: Arc<dyn OriginalityVerifier>,
    ) -> Self {
        Self {
            db,
            interpreter,
            verifier,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let api_routes = Router::new()
        .route("/api/buildinfo", get(api::get_build_info))
        .route("/api/classify-usage", post(api::classify_usage))
        .route(
            "/api/classify-usage/recommendations",
            post(api::get_recommendations),
        )
        .route("/api/classify-usage/batch", post(api::classify_batch))
        .route("/api/usage-checks/:ip_asset_id", get(api::get_usage_checks))
        .route("/api/parse-license", post(api::parse_license_text))
        .route("/api/parsed-licenses/:id", get(api::get_parsed_license))
        .route("/api/verify-originality", post(api::verify_originality));

    Router::new()
        .merge(api_routes)
        .merge(api::health_routes())
        .fallback(api::not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
