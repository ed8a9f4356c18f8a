//! Shared API request/response types
//!
//! Request types keep every field optional so a missing field can be reported
//! with a specific message instead of a generic deserialization failure. The
//! `validate` methods turn them into engine inputs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::db::UsageCheck;
use crate::license::{ParsedLicense, MAX_LICENSE_TEXT_CHARS};
use crate::rights::{ClassificationResult, RightsSchema, UsageAssessment, UsageContext, UseType};
use crate::{Error, Result};

// ========================================
// Error Response Types
// ========================================

/// Body of every 4xx/5xx response
///
/// # Examples
///
/// ```
/// use stellark_common::api::types::ErrorResponse;
///
/// let error = ErrorResponse::new("rightsSchema is required");
/// assert!(error.details.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Additional error details (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: Value) -> Self {
        Self {
            error: error.into(),
            details: Some(details),
        }
    }
}

/// GET /health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// RFC 3339 server time
    pub timestamp: String,
    pub version: String,
}

// ========================================
// Classification Types
// ========================================

/// Usage context as received on the wire, before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageContextInput {
    pub domain: Option<String>,
    pub use_type: Option<String>,
}

impl UsageContextInput {
    /// Require a non-empty domain and use type, and a known use type
    pub fn validate(&self) -> Result<UsageContext> {
        let domain = self.domain.as_deref().filter(|d| !d.is_empty());
        let use_type = self.use_type.as_deref().filter(|u| !u.is_empty());

        match (domain, use_type) {
            (Some(domain), Some(use_type)) => {
                Ok(UsageContext::new(domain, use_type.parse::<UseType>()?))
            }
            _ => Err(missing_context()),
        }
    }
}

fn missing_context() -> Error {
    Error::InvalidInput("usageContext with domain and useType is required".to_string())
}

fn require_schema(schema: &Option<RightsSchema>) -> Result<&RightsSchema> {
    schema
        .as_ref()
        .ok_or_else(|| Error::InvalidInput("rightsSchema is required".to_string()))
}

/// POST /api/classify-usage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyUsageRequest {
    pub rights_schema: Option<RightsSchema>,
    pub usage_context: Option<UsageContextInput>,
    /// When present the result is stored against this asset
    pub ip_asset_id: Option<String>,
}

impl ClassifyUsageRequest {
    pub fn validate(&self) -> Result<(&RightsSchema, UsageContext)> {
        let schema = require_schema(&self.rights_schema)?;
        let context = self
            .usage_context
            .as_ref()
            .ok_or_else(missing_context)?
            .validate()?;
        Ok((schema, context))
    }

    /// Asset to store the result against; blank ids are ignored
    pub fn ip_asset_id(&self) -> Option<&str> {
        self.ip_asset_id.as_deref().filter(|id| !id.trim().is_empty())
    }
}

/// Verdict merged with the schema's recommendation lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyUsageResponse {
    #[serde(flatten)]
    pub result: ClassificationResult,
    pub recommendations: Vec<String>,
}

/// POST /api/classify-usage/recommendations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsRequest {
    pub rights_schema: Option<RightsSchema>,
}

impl RecommendationsRequest {
    pub fn validate(&self) -> Result<&RightsSchema> {
        require_schema(&self.rights_schema)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<String>,
}

/// POST /api/classify-usage/batch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchClassifyRequest {
    pub rights_schema: Option<RightsSchema>,
    pub usage_contexts: Option<Vec<UsageContextInput>>,
}

impl BatchClassifyRequest {
    /// Every context must be valid; the first invalid one is reported by index
    pub fn validate(&self) -> Result<(&RightsSchema, Vec<UsageContext>)> {
        let schema = require_schema(&self.rights_schema)?;
        let inputs = self
            .usage_contexts
            .as_ref()
            .ok_or_else(|| Error::InvalidInput("usageContexts is required".to_string()))?;

        let contexts = inputs
            .iter()
            .enumerate()
            .map(|(index, input)| {
                input.validate().map_err(|e| match e {
                    Error::InvalidInput(msg) => {
                        Error::InvalidInput(format!("usageContexts[{}]: {}", index, msg))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok((schema, contexts))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchClassifyResponse {
    pub results: Vec<UsageAssessment>,
}

/// GET /api/usage-checks/:ip_asset_id
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageChecksResponse {
    pub ip_asset_id: String,
    pub checks: Vec<UsageCheck>,
}

// ========================================
// License Parsing Types
// ========================================

/// POST /api/parse-license
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseLicenseRequest {
    /// Kept untyped so a non-string value gets the same message as a missing one
    pub license_text: Option<Value>,
}

impl ParseLicenseRequest {
    pub fn validate(&self) -> Result<&str> {
        let text = self
            .license_text
            .as_ref()
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                Error::InvalidInput("licenseText is required and must be a string".to_string())
            })?;

        if text.chars().count() > MAX_LICENSE_TEXT_CHARS {
            return Err(Error::InvalidInput(format!(
                "licenseText exceeds maximum length of {} characters",
                MAX_LICENSE_TEXT_CHARS
            )));
        }

        Ok(text)
    }
}

/// Parsed license plus the id it was stored under
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseLicenseResponse {
    /// Key for GET /api/parsed-licenses/:id
    pub id: Uuid,
    #[serde(flatten)]
    pub parsed: ParsedLicense,
}

// ========================================
// Originality Types
// ========================================

/// POST /api/verify-originality
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOriginalityRequest {
    pub media_url: Option<Value>,
}

impl VerifyOriginalityRequest {
    /// Presence and type only; URL syntax is checked by the HTTP layer
    pub fn media_url(&self) -> Result<&str> {
        self.media_url
            .as_ref()
            .and_then(Value::as_str)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                Error::InvalidInput("mediaUrl is required and must be a string".to_string())
            })
    }
}

/// A piece of existing content resembling the checked media
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginalityMatch {
    pub url: String,
    /// 0.0 (unrelated) to 1.0 (identical)
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginalityReport {
    pub matches: Vec<OriginalityMatch>,
    pub originality_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOriginalityResponse {
    #[serde(flatten)]
    pub report: OriginalityReport,
    #[serde(rename = "_note", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// ========================================
// Tests
// ========================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rights::Classification;
    use serde_json::json;

    fn schema_json() -> Value {
        json!({
            "allowDerivatives": true,
            "allowCommercialUse": false,
            "attributionRequired": true,
            "shareAlike": false,
            "royaltyRateBps": 500,
            "territory": ["worldwide"],
            "prohibitedUses": [],
            "allowedPlatforms": []
        })
    }

    fn invalid_input_message(err: Error) -> String {
        match err {
            Error::InvalidInput(msg) => msg,
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_request_valid() {
        let request: ClassifyUsageRequest = serde_json::from_value(json!({
            "rightsSchema": schema_json(),
            "usageContext": { "domain": "myblog.com", "useType": "educational" },
            "ipAssetId": "0xabc"
        }))
        .unwrap();

        let (schema, context) = request.validate().unwrap();
        assert!(schema.attribution_required);
        assert_eq!(context.domain, "myblog.com");
        assert_eq!(context.use_type, UseType::Educational);
        assert_eq!(request.ip_asset_id(), Some("0xabc"));
    }

    #[test]
    fn test_classify_request_missing_schema() {
        let request: ClassifyUsageRequest = serde_json::from_value(json!({
            "usageContext": { "domain": "myblog.com", "useType": "educational" }
        }))
        .unwrap();

        let msg = invalid_input_message(request.validate().unwrap_err());
        assert_eq!(msg, "rightsSchema is required");
    }

    #[test]
    fn test_classify_request_missing_context_fields() {
        for context in [
            json!(null),
            json!({ "domain": "myblog.com" }),
            json!({ "useType": "commercial" }),
            json!({ "domain": "", "useType": "commercial" }),
        ] {
            let request: ClassifyUsageRequest = serde_json::from_value(json!({
                "rightsSchema": schema_json(),
                "usageContext": context
            }))
            .unwrap();

            let msg = invalid_input_message(request.validate().unwrap_err());
            assert_eq!(msg, "usageContext with domain and useType is required");
        }
    }

    #[test]
    fn test_classify_request_unknown_use_type() {
        let request: ClassifyUsageRequest = serde_json::from_value(json!({
            "rightsSchema": schema_json(),
            "usageContext": { "domain": "myblog.com", "useType": "personal" }
        }))
        .unwrap();

        let msg = invalid_input_message(request.validate().unwrap_err());
        assert_eq!(
            msg,
            "useType must be one of: commercial, non-commercial, derivative, educational"
        );
    }

    #[test]
    fn test_blank_ip_asset_id_ignored() {
        let request = ClassifyUsageRequest {
            ip_asset_id: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(request.ip_asset_id(), None);
    }

    #[test]
    fn test_batch_request_reports_invalid_index() {
        let request: BatchClassifyRequest = serde_json::from_value(json!({
            "rightsSchema": schema_json(),
            "usageContexts": [
                { "domain": "myblog.com", "useType": "educational" },
                { "domain": "shop.com", "useType": "retail" }
            ]
        }))
        .unwrap();

        let msg = invalid_input_message(request.validate().unwrap_err());
        assert_eq!(
            msg,
            "usageContexts[1]: useType must be one of: commercial, non-commercial, derivative, educational"
        );
    }

    #[test]
    fn test_batch_request_requires_contexts() {
        let request: BatchClassifyRequest = serde_json::from_value(json!({
            "rightsSchema": schema_json()
        }))
        .unwrap();

        let msg = invalid_input_message(request.validate().unwrap_err());
        assert_eq!(msg, "usageContexts is required");
    }

    #[test]
    fn test_classify_response_flattens_result() {
        let response = ClassifyUsageResponse {
            result: ClassificationResult {
                classification: Classification::LikelyPermitted,
                reason: "Usage appears to comply with rights schema".to_string(),
            },
            recommendations: vec!["✓ Commercial use is permitted".to_string()],
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["classification"], "Likely Permitted");
        assert_eq!(value["reason"], "Usage appears to comply with rights schema");
        assert_eq!(value["recommendations"][0], "✓ Commercial use is permitted");
    }

    #[test]
    fn test_parse_license_request_validation() {
        let ok = ParseLicenseRequest {
            license_text: Some(json!("CC BY 4.0")),
        };
        assert_eq!(ok.validate().unwrap(), "CC BY 4.0");

        for bad in [None, Some(json!(42)), Some(json!(""))] {
            let request = ParseLicenseRequest { license_text: bad };
            let msg = invalid_input_message(request.validate().unwrap_err());
            assert_eq!(msg, "licenseText is required and must be a string");
        }

        let long = ParseLicenseRequest {
            license_text: Some(json!("x".repeat(MAX_LICENSE_TEXT_CHARS + 1))),
        };
        let msg = invalid_input_message(long.validate().unwrap_err());
        assert_eq!(msg, "licenseText exceeds maximum length of 10000 characters");

        let at_limit = ParseLicenseRequest {
            license_text: Some(json!("x".repeat(MAX_LICENSE_TEXT_CHARS))),
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn test_originality_response_note() {
        let response = VerifyOriginalityResponse {
            report: OriginalityReport {
                matches: vec![],
                originality_score: 1.0,
            },
            note: Some("mock".to_string()),
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["originalityScore"], 1.0);
        assert_eq!(value["_note"], "mock");
    }

    #[test]
    fn test_error_response_skips_empty_details() {
        let json = serde_json::to_string(&ErrorResponse::new("boom")).unwrap();
        assert_eq!(json, r#"{"error":"boom"}"#);

        let with_details = ErrorResponse::with_details("boom", json!({"field": "x"}));
        assert!(with_details.details.is_some());
    }
}
