//! Rights schema and usage context types
//!
//! These are the request-scoped inputs and outputs of the classification engine.
//! Field names serialize in camelCase so the JSON shape matches the HTTP API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Territory entry meaning "no regional restriction"
pub const WORLDWIDE: &str = "worldwide";

/// Machine-checkable terms of a license
///
/// Empty `territory`, `prohibited_uses` and `allowed_platforms` lists mean
/// "no restriction", not "deny all".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RightsSchema {
    pub allow_derivatives: bool,
    pub allow_commercial_use: bool,
    pub attribution_required: bool,
    pub share_alike: bool,
    /// Royalty in basis points (100 = 1%)
    #[serde(default)]
    pub royalty_rate_bps: u32,
    #[serde(default)]
    pub territory: Vec<String>,
    #[serde(default)]
    pub prohibited_uses: Vec<String>,
    #[serde(default)]
    pub allowed_platforms: Vec<String>,
}

impl RightsSchema {
    /// Conservative schema used when a license cannot be interpreted
    ///
    /// Nothing is permitted beyond attributed, non-derivative, non-commercial use.
    pub fn restrictive() -> Self {
        Self {
            allow_derivatives: false,
            allow_commercial_use: false,
            attribution_required: true,
            share_alike: false,
            royalty_rate_bps: 0,
            territory: vec![WORLDWIDE.to_string()],
            prohibited_uses: Vec::new(),
            allowed_platforms: Vec::new(),
        }
    }

    /// True when a territory list is set and does not include `"worldwide"`
    pub fn is_territory_limited(&self) -> bool {
        !self.territory.is_empty() && !self.territory.iter().any(|t| t == WORLDWIDE)
    }

    /// Royalty rate as a percentage (500 bps -> 5.0)
    pub fn royalty_percentage(&self) -> f64 {
        f64::from(self.royalty_rate_bps) / 100.0
    }
}

/// How the licensed work is going to be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UseType {
    Commercial,
    NonCommercial,
    Derivative,
    Educational,
}

impl UseType {
    /// Every accepted use type, in the order reported to clients
    pub const ALL: [UseType; 4] = [
        UseType::Commercial,
        UseType::NonCommercial,
        UseType::Derivative,
        UseType::Educational,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UseType::Commercial => "commercial",
            UseType::NonCommercial => "non-commercial",
            UseType::Derivative => "derivative",
            UseType::Educational => "educational",
        }
    }

    /// Comma-separated list of accepted values, for validation messages
    pub fn accepted_values() -> String {
        Self::ALL
            .iter()
            .map(|u| u.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for UseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UseType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|u| u.as_str() == s)
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "useType must be one of: {}",
                    Self::accepted_values()
                ))
            })
    }
}

/// A concrete proposed use: where (domain) and how (use type)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageContext {
    /// Hostname-like identifier of where the work will appear
    pub domain: String,
    pub use_type: UseType,
}

impl UsageContext {
    pub fn new(domain: impl Into<String>, use_type: UseType) -> Self {
        Self {
            domain: domain.into(),
            use_type,
        }
    }
}

/// Verdict produced by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "Likely Violation")]
    LikelyViolation,
    #[serde(rename = "Likely Permitted")]
    LikelyPermitted,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::LikelyViolation => "Likely Violation",
            Classification::LikelyPermitted => "Likely Permitted",
        }
    }
}

impl FromStr for Classification {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Likely Violation" => Ok(Classification::LikelyViolation),
            "Likely Permitted" => Ok(Classification::LikelyPermitted),
            other => Err(Error::InvalidInput(format!(
                "unknown classification: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict plus its human-readable rationale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub classification: Classification,
    pub reason: String,
}

impl ClassificationResult {
    pub fn is_violation(&self) -> bool {
        self.classification == Classification::LikelyViolation
    }
}

/// One entry of a batch classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageAssessment {
    pub context: UsageContext,
    pub result: ClassificationResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rights_schema_camel_case_round_trip() {
        let json = r#"{
            "allowDerivatives": true,
            "allowCommercialUse": false,
            "attributionRequired": true,
            "shareAlike": false,
            "royaltyRateBps": 500,
            "territory": ["worldwide"],
            "prohibitedUses": [],
            "allowedPlatforms": ["story.foundation"]
        }"#;

        let schema: RightsSchema = serde_json::from_str(json).unwrap();
        assert!(schema.allow_derivatives);
        assert!(!schema.allow_commercial_use);
        assert_eq!(schema.royalty_rate_bps, 500);
        assert_eq!(schema.allowed_platforms, vec!["story.foundation"]);

        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["royaltyRateBps"], 500);
        assert_eq!(value["allowedPlatforms"][0], "story.foundation");
    }

    #[test]
    fn test_rights_schema_lists_default_to_empty() {
        let json = r#"{
            "allowDerivatives": false,
            "allowCommercialUse": false,
            "attributionRequired": false,
            "shareAlike": false
        }"#;

        let schema: RightsSchema = serde_json::from_str(json).unwrap();
        assert_eq!(schema.royalty_rate_bps, 0);
        assert!(schema.territory.is_empty());
        assert!(schema.prohibited_uses.is_empty());
        assert!(schema.allowed_platforms.is_empty());
    }

    #[test]
    fn test_negative_royalty_rejected() {
        let json = r#"{
            "allowDerivatives": false,
            "allowCommercialUse": false,
            "attributionRequired": false,
            "shareAlike": false,
            "royaltyRateBps": -5
        }"#;

        assert!(serde_json::from_str::<RightsSchema>(json).is_err());
    }

    #[test]
    fn test_territory_limited() {
        let mut schema = RightsSchema::restrictive();
        assert!(!schema.is_territory_limited());

        schema.territory = vec![];
        assert!(!schema.is_territory_limited());

        schema.territory = vec!["US".to_string(), "EU".to_string()];
        assert!(schema.is_territory_limited());

        schema.territory = vec!["US".to_string(), "worldwide".to_string()];
        assert!(!schema.is_territory_limited());

        // Literal match only
        schema.territory = vec!["Worldwide".to_string()];
        assert!(schema.is_territory_limited());
    }

    #[test]
    fn test_use_type_parsing() {
        assert_eq!("commercial".parse::<UseType>().unwrap(), UseType::Commercial);
        assert_eq!(
            "non-commercial".parse::<UseType>().unwrap(),
            UseType::NonCommercial
        );
        assert_eq!("derivative".parse::<UseType>().unwrap(), UseType::Derivative);
        assert_eq!("educational".parse::<UseType>().unwrap(), UseType::Educational);

        let err = "Commercial".parse::<UseType>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input: useType must be one of: commercial, non-commercial, derivative, educational"
        );
    }

    #[test]
    fn test_use_type_serde_matches_as_str() {
        for use_type in UseType::ALL {
            let json = serde_json::to_string(&use_type).unwrap();
            assert_eq!(json, format!("\"{}\"", use_type.as_str()));
        }
    }

    #[test]
    fn test_classification_serialization() {
        let result = ClassificationResult {
            classification: Classification::LikelyViolation,
            reason: "Commercial use not allowed".to_string(),
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["classification"], "Likely Violation");
        assert_eq!(value["reason"], "Commercial use not allowed");
        assert!(result.is_violation());
    }

    #[test]
    fn test_royalty_percentage() {
        let mut schema = RightsSchema::restrictive();
        schema.royalty_rate_bps = 250;
        assert_eq!(schema.royalty_percentage(), 2.5);
    }
}
