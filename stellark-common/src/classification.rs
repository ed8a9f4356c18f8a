//! Usage-rights classification engine
//!
//! Checks a proposed [`UsageContext`] against a [`RightsSchema`] and produces a
//! verdict with a human-readable rationale. Everything here is pure: no I/O, no
//! shared state, safe to call from any number of handlers at once.
//!
//! Rules run independently and every match is reported. The rule order below is
//! the order messages appear in the joined reason, not a priority order:
//!
//! 1. Commercial use (use type, then known commercial platforms)
//! 2. Derivative works
//! 3. Prohibited uses
//! 4. Allowed platforms
//! 5. Territory

use crate::rights::{
    Classification, ClassificationResult, RightsSchema, UsageAssessment, UsageContext, UseType,
};

/// Domains treated as commercial storefronts regardless of the declared use type
pub const COMMERCIAL_DOMAINS: [&str; 6] = [
    "shopify.com",
    "amazon.com",
    "etsy.com",
    "ebay.com",
    "alibaba.com",
    "walmart.com",
];

const REASON_SEPARATOR: &str = "; ";
const COMPLIANT: &str = "Usage appears to comply with rights schema";
const COMPLIANT_WITH_ATTRIBUTION: &str =
    "Usage appears to comply with rights schema. Note: Attribution is required.";

/// A single rule: inspects the inputs and appends any violation messages
type Rule = fn(&RightsSchema, &UsageContext, &mut Vec<String>);

const RULES: [Rule; 5] = [
    check_commercial_use,
    check_derivatives,
    check_prohibited_uses,
    check_allowed_platforms,
    check_territory,
];

/// Classify a usage against a rights schema
pub fn classify(schema: &RightsSchema, context: &UsageContext) -> ClassificationResult {
    let mut violations = Vec::new();
    for rule in RULES {
        rule(schema, context, &mut violations);
    }

    if !violations.is_empty() {
        return ClassificationResult {
            classification: Classification::LikelyViolation,
            reason: violations.join(REASON_SEPARATOR),
        };
    }

    let reason = if schema.attribution_required {
        COMPLIANT_WITH_ATTRIBUTION
    } else {
        COMPLIANT
    };

    ClassificationResult {
        classification: Classification::LikelyPermitted,
        reason: reason.to_string(),
    }
}

/// Classify several usages against the same schema, preserving input order
pub fn classify_multiple(schema: &RightsSchema, contexts: &[UsageContext]) -> Vec<UsageAssessment> {
    contexts
        .iter()
        .map(|context| UsageAssessment {
            context: context.clone(),
            result: classify(schema, context),
        })
        .collect()
}

/// Display lines summarising what a schema permits
///
/// Independent of any usage context; the same schema always yields the same lines
/// in the same order.
pub fn recommendations(schema: &RightsSchema) -> Vec<String> {
    let mut lines = Vec::new();

    if schema.allow_commercial_use {
        lines.push("✓ Commercial use is permitted".to_string());
    } else {
        lines.push("✗ Commercial use is NOT permitted".to_string());
    }

    if schema.allow_derivatives {
        lines.push("✓ Derivative works are permitted".to_string());
        if schema.share_alike {
            lines.push("  → Derivatives must use the same license (ShareAlike)".to_string());
        }
    } else {
        lines.push("✗ Derivative works are NOT permitted".to_string());
    }

    if schema.attribution_required {
        lines.push("⚠ Attribution is required".to_string());
    }

    if schema.royalty_rate_bps > 0 {
        lines.push(format!(
            "💰 Royalty payment required: {}%",
            schema.royalty_percentage()
        ));
    }

    if schema.is_territory_limited() {
        lines.push(format!(
            "🌍 Limited to territories: {}",
            schema.territory.join(", ")
        ));
    }

    if !schema.prohibited_uses.is_empty() {
        lines.push(format!(
            "🚫 Prohibited uses: {}",
            schema.prohibited_uses.join(", ")
        ));
    }

    if !schema.allowed_platforms.is_empty() {
        lines.push(format!(
            "📱 Allowed platforms only: {}",
            schema.allowed_platforms.join(", ")
        ));
    }

    lines
}

/// Use type and domain are independent signals; both may fire.
fn check_commercial_use(schema: &RightsSchema, context: &UsageContext, out: &mut Vec<String>) {
    if schema.allow_commercial_use {
        return;
    }

    if context.use_type == UseType::Commercial {
        out.push("Commercial use not allowed".to_string());
    }

    if COMMERCIAL_DOMAINS
        .iter()
        .any(|domain| context.domain.contains(*domain))
    {
        out.push(format!(
            "Domain '{}' indicates commercial use which is not allowed",
            context.domain
        ));
    }
}

fn check_derivatives(schema: &RightsSchema, context: &UsageContext, out: &mut Vec<String>) {
    if !schema.allow_derivatives && context.use_type == UseType::Derivative {
        out.push("Derivative works not allowed".to_string());
    }
}

/// The only case-insensitive comparison in the engine.
fn check_prohibited_uses(schema: &RightsSchema, context: &UsageContext, out: &mut Vec<String>) {
    let use_type = context.use_type.as_str().to_lowercase();
    let matched: Vec<&str> = schema
        .prohibited_uses
        .iter()
        .filter(|prohibited| use_type.contains(&prohibited.to_lowercase()))
        .map(String::as_str)
        .collect();

    if !matched.is_empty() {
        out.push(format!(
            "Use type '{}' matches prohibited uses: {}",
            context.use_type,
            matched.join(", ")
        ));
    }
}

fn check_allowed_platforms(schema: &RightsSchema, context: &UsageContext, out: &mut Vec<String>) {
    if schema.allowed_platforms.is_empty() {
        return;
    }

    let allowed = schema
        .allowed_platforms
        .iter()
        .any(|platform| context.domain.contains(platform.as_str()));

    if !allowed {
        out.push(format!(
            "Platform '{}' not in allowed list: {}",
            context.domain,
            schema.allowed_platforms.join(", ")
        ));
    }
}

/// Advisory only, but it still counts toward a violation verdict.
fn check_territory(schema: &RightsSchema, _context: &UsageContext, out: &mut Vec<String>) {
    if schema.is_territory_limited() {
        out.push(format!(
            "Territory restrictions apply: {} - verify compliance",
            schema.territory.join(", ")
        ));
    }
}
