//! HTTP API handlers for stellark-api

pub mod buildinfo;
pub mod classify;
pub mod health;
pub mod license;
pub mod originality;

pub use buildinfo::get_build_info;
pub use classify::{classify_batch, classify_usage, get_recommendations, get_usage_checks};
pub use health::health_routes;
pub use license::{get_parsed_license, parse_license_text};
pub use originality::verify_originality;

use crate::error::ApiError;

/// Fallback for unmatched routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}
