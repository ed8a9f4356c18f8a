//! Database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::rights::{Classification, RightsSchema, UseType};

/// A classification stored against an IP asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageCheck {
    pub guid: Uuid,
    pub ip_asset_id: String,
    pub domain: String,
    pub use_type: UseType,
    pub classification: Classification,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

/// A license text together with the schema derived from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedLicenseRecord {
    pub guid: Uuid,
    pub license_text: String,
    pub schema: RightsSchema,
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
}
