//! Originality verification
//!
//! The upstream similarity service requires credentials the service does not
//! carry yet, so the only verifier is a fixed mock. Responses from a mock are
//! labelled with a note so clients never mistake them for a real check.

use async_trait::async_trait;
use reqwest::Url;
use stellark_common::api::{OriginalityMatch, OriginalityReport};
use thiserror::Error;

/// Note attached to every mock report
pub const MOCK_NOTE: &str = "MOCK: for dev only - originality API requires authentication";

/// The similarity backend could not produce a report
#[derive(Debug, Error)]
#[error("Originality service unavailable: {0}")]
pub struct OriginalityError(pub String);

/// Compares media against existing content
#[async_trait]
pub trait OriginalityVerifier: Send + Sync {
    /// Note to return alongside results, if any
    fn note(&self) -> Option<&'static str> {
        None
    }

    async fn verify(&self, media_url: &Url) -> Result<OriginalityReport, OriginalityError>;
}

/// Returns the same report for every URL
#[derive(Debug, Default, Clone, Copy)]
pub struct MockOriginalityVerifier;

#[async_trait]
impl OriginalityVerifier for MockOriginalityVerifier {
    fn note(&self) -> Option<&'static str> {
        Some(MOCK_NOTE)
    }

    async fn verify(&self, media_url: &Url) -> Result<OriginalityReport, OriginalityError> {
        tracing::debug!(%media_url, "Mock originality check");
        Ok(OriginalityReport {
            matches: vec![OriginalityMatch {
                url: "example.com".to_string(),
                similarity: 0.85,
            }],
            originality_score: 0.9,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_report_is_fixed() {
        let verifier = MockOriginalityVerifier;
        let a = verifier
            .verify(&Url::parse("https://cdn.example.net/a.png").unwrap())
            .await
            .unwrap();
        let b = verifier
            .verify(&Url::parse("ipfs://bafy/b.mp3").unwrap())
            .await
            .unwrap();

        assert_eq!(a, b);
        assert_eq!(a.originality_score, 0.9);
        assert_eq!(a.matches[0].similarity, 0.85);
        assert_eq!(verifier.note(), Some(MOCK_NOTE));
    }
}
