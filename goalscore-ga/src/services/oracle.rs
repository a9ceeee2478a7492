//! Scoring oracle client
//!
//! OpenAI-compatible chat-completions client used to score goal batches.
//! The oracle is inherently non-deterministic and schema-unenforced, so
//! everything it returns is parsed defensively: a malformed response is a
//! typed error the pipeline treats as a batch-local failure, never a
//! request-level abort.

use async_trait::async_trait;
use goalscore_common::models::{BatchAnalysis, RowRecord};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::services::prompt::build_scoring_prompt;

const USER_AGENT: &str = "GoalScore/0.1.0 (goal analysis service)";
const CHAT_MODEL: &str = "gpt-3.5-turbo";
const TEMPERATURE: f64 = 0.3;
const MAX_TOKENS: u32 = 1000;
// Per-batch timeout; expiry is a batch-local failure
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Scoring oracle errors
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Response carried no message content")]
    MissingContent,

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Narrow scoring interface so the HTTP-backed oracle can be swapped for a
/// deterministic fake in tests.
#[async_trait]
pub trait ScoreOracle: Send + Sync {
    /// Score one batch of rows, returning per-row evaluations and
    /// per-employee partial aggregates.
    async fn score_batch(&self, rows: &[RowRecord]) -> Result<BatchAnalysis, OracleError>;
}

/// chat-completions response subset
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Production oracle backed by an OpenAI-compatible API
pub struct OpenAiOracle {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiOracle {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, OracleError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| OracleError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl ScoreOracle for OpenAiOracle {
    async fn score_batch(&self, rows: &[RowRecord]) -> Result<BatchAnalysis, OracleError> {
        let prompt = build_scoring_prompt(rows);

        let body = serde_json::json!({
            "model": CHAT_MODEL,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        });

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        tracing::debug!(rows = rows.len(), url = %url, "Submitting batch to scoring oracle");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| OracleError::Network(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(OracleError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(OracleError::Api(status.as_u16(), error_text));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| OracleError::Parse(e.to_string()))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(OracleError::MissingContent)?;

        let analysis = parse_batch_analysis(&content)?;

        tracing::debug!(
            goals = analysis.goals.len(),
            employees = analysis.employees.len(),
            "Oracle batch scored"
        );

        Ok(analysis)
    }
}

/// Parse oracle message content into a `BatchAnalysis`.
///
/// Tolerates Markdown code fences around the JSON object and missing
/// `goals`/`employees` arrays; anything else malformed is a parse error.
pub fn parse_batch_analysis(content: &str) -> Result<BatchAnalysis, OracleError> {
    serde_json::from_str(strip_code_fences(content)).map_err(|e| OracleError::Parse(e.to_string()))
}

/// Strip a surrounding ```/```json fence, if present.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.trim_start();
    match rest.strip_suffix("```") {
        Some(inner) => inner.trim_end(),
        None => rest,
    }
}
