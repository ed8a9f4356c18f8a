//! # Stellark Common Library
//!
//! Shared code for the Stellark rights service including:
//! - Rights schema and usage context types
//! - The usage-rights classification engine and recommendations
//! - Known-license presets and interpreter output sanitising
//! - API request/response types
//! - Configuration loading
//! - SQLite persistence of results

pub mod api;
pub mod classification;
pub mod config;
pub mod db;
pub mod error;
pub mod license;
pub mod rights;

pub use classification::{classify, classify_multiple, recommendations};
pub use error::{Error, Result};
pub use license::{KnownLicense, ParsedLicense};
pub use rights::{
    Classification, ClassificationResult, RightsSchema, UsageAssessment, UsageContext, UseType,
};
