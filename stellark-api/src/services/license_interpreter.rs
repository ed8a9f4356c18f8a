//! License interpretation
//!
//! Known license identifiers are resolved locally. Anything else is sent to a
//! language-model interpreter behind the [`LicenseInterpreter`] trait; the
//! shipped implementation talks to an OpenAI-compatible chat completion API
//! (Groq by default).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use stellark_common::config::InterpreterConfig;
use stellark_common::license::{self, KnownLicense, ParsedLicense, CONFIDENCE_FAILED};
use thiserror::Error;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("stellark-api/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const TEMPERATURE: f32 = 0.1;
const MAX_TOKENS: u32 = 1024;

const SYSTEM_PROMPT: &str = r#"You are a legal document parser. Output ONLY valid JSON matching this schema:
{
  "allowDerivatives": boolean,
  "allowCommercialUse": boolean,
  "attributionRequired": boolean,
  "shareAlike": boolean,
  "royaltyRateBps": number (basis points, 100 = 1%),
  "territory": string[] (e.g., ["worldwide"] or ["US", "EU"]),
  "prohibitedUses": string[] (e.g., ["adult-content", "weapons"]),
  "allowedPlatforms": string[] (optional, e.g., ["story.foundation"])
}"#;

/// Interpreter client errors
#[derive(Debug, Error)]
pub enum InterpreterError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Turns free-form license text into a raw answer expected to hold a JSON schema
#[async_trait]
pub trait LicenseInterpreter: Send + Sync {
    /// Interpreter identifier for logs
    fn name(&self) -> &'static str;

    /// Ask the interpreter about `license_text`; returns its raw answer
    async fn interpret(&self, license_text: &str) -> Result<String, InterpreterError>;
}

/// Derive a rights schema from license text
///
/// Known identifiers win; otherwise the interpreter is consulted. Interpreter
/// failure (or no interpreter configured) yields the restrictive fallback with
/// the lowest confidence rather than an error.
pub async fn parse_license(
    license_text: &str,
    interpreter: Option<&dyn LicenseInterpreter>,
) -> ParsedLicense {
    if let Some(known) = KnownLicense::identify(license_text) {
        debug!(license = known.name(), "Matched known license");
        return known.parsed();
    }

    let Some(interpreter) = interpreter else {
        warn!("No license interpreter configured, using restrictive fallback schema");
        return ParsedLicense::fallback(CONFIDENCE_FAILED);
    };

    match interpreter.interpret(license_text).await {
        Ok(answer) => license::from_interpreter_output(&answer),
        Err(e) => {
            warn!(interpreter = interpreter.name(), "License interpretation failed: {}", e);
            ParsedLicense::fallback(CONFIDENCE_FAILED)
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatAnswer>,
}

#[derive(Debug, Deserialize)]
struct ChatAnswer {
    content: Option<String>,
}

/// OpenAI-compatible chat completion client
pub struct GroqInterpreter {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GroqInterpreter {
    pub fn new(api_key: String, model: String, base_url: &str) -> Result<Self, InterpreterError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| InterpreterError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            model,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
        })
    }

    /// `None` when no API key is configured
    pub fn from_config(config: &InterpreterConfig) -> Result<Option<Self>, InterpreterError> {
        match &config.api_key {
            Some(key) => {
                let interpreter = Self::new(key.clone(), config.model.clone(), &config.base_url)?;
                info!(model = %config.model, "License interpreter enabled");
                Ok(Some(interpreter))
            }
            None => Ok(None),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Prompt sent as the user message
pub fn user_prompt(license_text: &str) -> String {
    format!(
        "Parse this license text into Stellark Rights Schema JSON only. Output VALID JSON. \
         Fields exactly as schema. Infer conservatively; default false/null if ambiguous.\n\
         License: {}",
        license_text
    )
}

#[async_trait]
impl LicenseInterpreter for GroqInterpreter {
    fn name(&self) -> &'static str {
        "groq"
    }

    async fn interpret(&self, license_text: &str) -> Result<String, InterpreterError> {
        let prompt = user_prompt(license_text);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        debug!(model = %self.model, chars = license_text.len(), "Querying license interpreter");

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| InterpreterError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(InterpreterError::ApiError(status.as_u16(), error_text));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| InterpreterError::ParseError(e.to_string()))?;

        // An empty answer is treated as an empty object
        Ok(chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_else(|| "{}".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stellark_common::license::{CONFIDENCE_INTERPRETED, CONFIDENCE_NO_JSON};
    use stellark_common::RightsSchema;

    struct FixedInterpreter(Result<&'static str, ()>);

    #[async_trait]
    impl LicenseInterpreter for FixedInterpreter {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn interpret(&self, _license_text: &str) -> Result<String, InterpreterError> {
            self.0
                .map(str::to_string)
                .map_err(|_| InterpreterError::NetworkError("unreachable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_known_license_skips_interpreter() {
        let interpreter = FixedInterpreter(Err(()));
        let parsed = parse_license("CC BY-SA 4.0", Some(&interpreter)).await;

        assert_eq!(parsed, KnownLicense::CcBySa.parsed());
    }

    #[tokio::test]
    async fn test_interpreter_answer_used() {
        let interpreter = FixedInterpreter(Ok(
            r#"{"allowDerivatives": true, "allowCommercialUse": true, "royaltyRateBps": 300}"#,
        ));
        let parsed = parse_license("Custom license v2", Some(&interpreter)).await;

        assert_eq!(parsed.confidence, CONFIDENCE_INTERPRETED);
        assert!(parsed.schema.allow_commercial_use);
        assert_eq!(parsed.schema.royalty_rate_bps, 300);
    }

    #[tokio::test]
    async fn test_interpreter_without_json() {
        let interpreter = FixedInterpreter(Ok("Sorry, I can't help with that."));
        let parsed = parse_license("Custom license v2", Some(&interpreter)).await;

        assert_eq!(parsed.confidence, CONFIDENCE_NO_JSON);
        assert_eq!(parsed.schema, RightsSchema::restrictive());
    }

    #[tokio::test]
    async fn test_interpreter_failure_falls_back() {
        let interpreter = FixedInterpreter(Err(()));
        let parsed = parse_license("Custom license v2", Some(&interpreter)).await;

        assert_eq!(parsed, ParsedLicense::fallback(CONFIDENCE_FAILED));
    }

    #[tokio::test]
    async fn test_no_interpreter_falls_back() {
        let parsed = parse_license("Custom license v2", None).await;
        assert_eq!(parsed, ParsedLicense::fallback(CONFIDENCE_FAILED));
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = InterpreterConfig::default();
        assert!(GroqInterpreter::from_config(&config).unwrap().is_none());

        let config = InterpreterConfig {
            api_key: Some("gsk_test".to_string()),
            base_url: "http://localhost:8080/v1/".to_string(),
            ..Default::default()
        };
        let interpreter = GroqInterpreter::from_config(&config).unwrap().unwrap();
        assert_eq!(interpreter.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_user_prompt_embeds_text() {
        let prompt = user_prompt("Free for personal use only");
        assert!(prompt.ends_with("License: Free for personal use only"));
    }
}
