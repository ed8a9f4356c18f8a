//! Shared HTTP API request/response types
//!
//! # Design Principle
//!
//! This module contains ONLY:
//! - Serde types describing the JSON wire shapes
//! - Pure validation turning loosely-typed requests into engine inputs
//!
//! The HTTP service wraps these with framework-specific extractors (Axum).

pub mod types;

pub use types::{
    BatchClassifyRequest, BatchClassifyResponse, ClassifyUsageRequest, ClassifyUsageResponse,
    ErrorResponse, HealthResponse, OriginalityMatch, OriginalityReport, ParseLicenseRequest,
    ParseLicenseResponse,
    RecommendationsRequest, RecommendationsResponse, UsageChecksResponse, UsageContextInput,
    VerifyOriginalityRequest, VerifyOriginalityResponse,
};
