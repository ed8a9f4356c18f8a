//! License text to rights schema
//!
//! Two paths produce a [`ParsedLicense`]:
//! - [`KnownLicense::identify`] recognises common license identifiers (Creative
//!   Commons family, CC0, "all rights reserved") without any external call.
//! - [`from_interpreter_output`] turns the free-form answer of a language-model
//!   interpreter into a schema, keeping only fields of the expected JSON type.
//!
//! Anything that cannot be interpreted falls back to [`RightsSchema::restrictive`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rights::{RightsSchema, WORLDWIDE};

/// Upper bound on accepted license text, in characters
pub const MAX_LICENSE_TEXT_CHARS: usize = 10_000;

/// Confidence when the interpreter returned a usable JSON object
pub const CONFIDENCE_INTERPRETED: f64 = 0.9;
/// Confidence when the interpreter answered without any JSON object
pub const CONFIDENCE_NO_JSON: f64 = 0.3;
/// Confidence when the interpreter failed or is unavailable
pub const CONFIDENCE_FAILED: f64 = 0.1;

/// Schema derived from license text plus how much to trust it (0.0 to 1.0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedLicense {
    pub schema: RightsSchema,
    pub confidence: f64,
}

impl ParsedLicense {
    /// Restrictive fallback with the given confidence
    pub fn fallback(confidence: f64) -> Self {
        Self {
            schema: RightsSchema::restrictive(),
            confidence,
        }
    }
}

/// Licenses recognised from their identifier alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownLicense {
    Cc0,
    CcByNcSa,
    CcByNcNd,
    CcByNc,
    CcByNd,
    CcBySa,
    CcBy,
    AllRightsReserved,
}

impl KnownLicense {
    /// Identify a license from its text
    ///
    /// Matching is case-insensitive and treats spaces and underscores inside an
    /// identifier like hyphens ("CC BY-NC" == "cc-by-nc"). The most specific
    /// Creative Commons identifier wins.
    pub fn identify(text: &str) -> Option<KnownLicense> {
        let lowered = text.to_lowercase();
        let normalized: String = lowered
            .chars()
            .map(|c| if c.is_whitespace() || c == '_' { '-' } else { c })
            .collect();

        if normalized.contains("cc0") || lowered.contains("public domain") {
            return Some(KnownLicense::Cc0);
        }

        const CC_FAMILY: [(&str, KnownLicense); 6] = [
            ("cc-by-nc-sa", KnownLicense::CcByNcSa),
            ("cc-by-nc-nd", KnownLicense::CcByNcNd),
            ("cc-by-nc", KnownLicense::CcByNc),
            ("cc-by-nd", KnownLicense::CcByNd),
            ("cc-by-sa", KnownLicense::CcBySa),
            ("cc-by", KnownLicense::CcBy),
        ];

        if let Some((_, license)) = CC_FAMILY.iter().find(|(id, _)| normalized.contains(id)) {
            return Some(*license);
        }

        if lowered.contains("all rights reserved") {
            return Some(KnownLicense::AllRightsReserved);
        }

        None
    }

    pub fn name(&self) -> &'static str {
        match self {
            KnownLicense::Cc0 => "CC0",
            KnownLicense::CcByNcSa => "CC-BY-NC-SA",
            KnownLicense::CcByNcNd => "CC-BY-NC-ND",
            KnownLicense::CcByNc => "CC-BY-NC",
            KnownLicense::CcByNd => "CC-BY-ND",
            KnownLicense::CcBySa => "CC-BY-SA",
            KnownLicense::CcBy => "CC-BY",
            KnownLicense::AllRightsReserved => "All Rights Reserved",
        }
    }

    pub fn confidence(&self) -> f64 {
        match self {
            KnownLicense::Cc0 => 0.98,
            _ => 0.95,
        }
    }

    /// Rights granted by this license
    pub fn schema(&self) -> RightsSchema {
        // (derivatives, commercial, attribution, share-alike)
        let (derivatives, commercial, attribution, share_alike) = match self {
            KnownLicense::Cc0 => (true, true, false, false),
            KnownLicense::CcBy => (true, true, true, false),
            KnownLicense::CcBySa => (true, true, true, true),
            KnownLicense::CcByNc => (true, false, true, false),
            KnownLicense::CcByNcSa => (true, false, true, true),
            KnownLicense::CcByNcNd => (false, false, true, false),
            KnownLicense::CcByNd => (false, true, true, false),
            KnownLicense::AllRightsReserved => (false, false, true, false),
        };

        RightsSchema {
            allow_derivatives: derivatives,
            allow_commercial_use: commercial,
            attribution_required: attribution,
            share_alike,
            royalty_rate_bps: 0,
            territory: vec![WORLDWIDE.to_string()],
            prohibited_uses: Vec::new(),
            allowed_platforms: Vec::new(),
        }
    }

    pub fn parsed(&self) -> ParsedLicense {
        ParsedLicense {
            schema: self.schema(),
            confidence: self.confidence(),
        }
    }
}

/// Build a schema from an interpreter answer
///
/// The answer may wrap the JSON object in prose or code fences; the span from the
/// first `{` to the last `}` is parsed.
pub fn from_interpreter_output(content: &str) -> ParsedLicense {
    let Some(json) = extract_json_object(content) else {
        tracing::warn!("License interpreter answer contained no JSON object");
        return ParsedLicense::fallback(CONFIDENCE_NO_JSON);
    };

    match serde_json::from_str::<Value>(json) {
        Ok(value) => ParsedLicense {
            schema: sanitize_schema(&value),
            confidence: CONFIDENCE_INTERPRETED,
        },
        Err(e) => {
            tracing::warn!("License interpreter returned invalid JSON: {}", e);
            ParsedLicense::fallback(CONFIDENCE_FAILED)
        }
    }
}

fn extract_json_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (end > start).then(|| &content[start..=end])
}

/// Keep well-typed fields, default the rest
fn sanitize_schema(value: &Value) -> RightsSchema {
    let flag = |key: &str, default: bool| value.get(key).and_then(Value::as_bool).unwrap_or(default);

    RightsSchema {
        allow_derivatives: flag("allowDerivatives", false),
        allow_commercial_use: flag("allowCommercialUse", false),
        attribution_required: flag("attributionRequired", true),
        share_alike: flag("shareAlike", false),
        royalty_rate_bps: value
            .get("royaltyRateBps")
            .and_then(Value::as_f64)
            .map(clamp_bps)
            .unwrap_or(0),
        territory: string_list(value.get("territory"))
            .unwrap_or_else(|| vec![WORLDWIDE.to_string()]),
        prohibited_uses: string_list(value.get("prohibitedUses")).unwrap_or_default(),
        allowed_platforms: string_list(value.get("allowedPlatforms")).unwrap_or_default(),
    }
}

fn clamp_bps(raw: f64) -> u32 {
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    raw.round().min(f64::from(u32::MAX)) as u32
}

/// `None` when the field is absent or not an array; non-string entries are dropped.
fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let items = value?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}
