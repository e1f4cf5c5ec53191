//! Hosted model clients that answer a move request with a JSON object.
//!
//! Both providers are pushed toward `{"row": int, "col": int, "reasoning": str}`
//! at the source: Gemini through a response schema, Claude by prefilling
//! the opening brace of its answer. The text still goes through
//! [`parse_reply`](crate::parse_reply) afterwards.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use tracing::{debug, error, info, instrument};

const GEMINI_MODELS_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Start of the assistant turn sent to Claude; the reply continues after it.
const JSON_PREFILL: &str = "{";

/// Hosted model family answering oracle requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Google Gemini, constrained by a response schema.
    Gemini,
    /// Anthropic Claude, steered by a JSON prefill.
    Anthropic,
}

impl LlmProvider {
    /// Environment variable holding this provider's API key.
    pub fn api_key_var(self) -> &'static str {
        match self {
            LlmProvider::Gemini => "GEMINI_API_KEY",
            LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

/// Model, credentials and output budget for one oracle.
#[derive(Clone, Getters)]
pub struct LlmConfig {
    /// Provider to call.
    provider: LlmProvider,
    #[getter(skip)]
    api_key: String,
    /// Model identifier, e.g. `gemini-2.5-pro`.
    model: String,
    /// Output token budget per move.
    max_tokens: u32,
}

impl LlmConfig {
    /// Creates a new LLM configuration.
    pub fn new(provider: LlmProvider, api_key: String, model: String, max_tokens: u32) -> Self {
        Self {
            provider,
            api_key,
            model,
            max_tokens,
        }
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Client asking one hosted model for moves.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: LlmConfig,
    http: reqwest::Client,
}

impl LlmClient {
    /// Creates a new LLM client.
    #[instrument(skip(config), fields(provider = %config.provider, model = %config.model))]
    pub fn new(config: LlmConfig) -> Self {
        info!("Creating LLM client");
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Asks for a move on a `board_size`-wide board.
    ///
    /// Returns the model's text, which should hold one JSON object.
    #[instrument(
        skip(self, system_prompt, user_prompt),
        fields(provider = %self.config.provider, model = %self.config.model)
    )]
    pub async fn request_move(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        board_size: usize,
    ) -> Result<String, LlmError> {
        let text = match self.config.provider {
            LlmProvider::Gemini => self.gemini(system_prompt, user_prompt, board_size).await?,
            LlmProvider::Anthropic => self.anthropic(system_prompt, user_prompt).await?,
        };
        info!(content_length = text.len(), "Model answered");
        Ok(text)
    }

    async fn gemini(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        board_size: usize,
    ) -> Result<String, LlmError> {
        let url = format!("{}/{}:generateContent", GEMINI_MODELS_URL, self.config.model);
        let body = json!({
            "systemInstruction": { "parts": [{ "text": system_prompt }] },
            "contents": [{ "role": "user", "parts": [{ "text": user_prompt }] }],
            "generationConfig": {
                "maxOutputTokens": self.config.max_tokens,
                "responseMimeType": "application/json",
                "responseSchema": move_schema(board_size),
            }
        });

        let reply = self
            .post(&url, &[("x-goog-api-key", self.config.api_key.as_str())], &body)
            .await?;
        gemini_text(&reply).ok_or_else(|| {
            error!(response = %reply, "Gemini answered without text");
            LlmError::new(format!("Gemini answered without text: {}", finish_reason(&reply)))
        })
    }

    async fn anthropic(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "system": system_prompt,
            "messages": [
                { "role": "user", "content": user_prompt },
                { "role": "assistant", "content": JSON_PREFILL },
            ]
        });

        let headers = [
            ("x-api-key", self.config.api_key.as_str()),
            ("anthropic-version", ANTHROPIC_VERSION),
        ];
        let reply = self.post(ANTHROPIC_MESSAGES_URL, &headers, &body).await?;
        anthropic_text(&reply).ok_or_else(|| {
            error!(response = %reply, "Claude answered without text");
            LlmError::new("Claude answered without text".to_string())
        })
    }

    /// Posts `body` and returns the decoded JSON of a successful answer.
    async fn post(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &Value,
    ) -> Result<Value, LlmError> {
        let provider = self.config.provider;
        debug!(%provider, "Sending move request");

        let mut request = self.http.post(url).json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| LlmError::new(format!("{} request failed: {}", provider, e)))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::new(format!("{} response unreadable: {}", provider, e)))?;

        if !status.is_success() {
            return Err(LlmError::new(format!("{} returned {}: {}", provider, status, text)));
        }
        serde_json::from_str(&text)
            .map_err(|e| LlmError::new(format!("{} response is not JSON: {}", provider, e)))
    }
}

/// Gemini response schema for a move on a `board_size`-wide board.
pub fn move_schema(board_size: usize) -> Value {
    let max = board_size.saturating_sub(1);
    json!({
        "type": "OBJECT",
        "properties": {
            "row": {
                "type": "INTEGER",
                "description": format!("The row index (0-{})", max),
            },
            "col": {
                "type": "INTEGER",
                "description": format!("The column index (0-{})", max),
            },
            "reasoning": {
                "type": "STRING",
                "description": "A brief strategic explanation of the move",
            }
        },
        "required": ["row", "col"],
    })
}

/// Answer text of the first candidate, skipping thought summaries.
fn gemini_text(reply: &Value) -> Option<String> {
    let text: String = reply["candidates"][0]["content"]["parts"]
        .as_array()?
        .iter()
        .filter(|part| part["thought"].as_bool() != Some(true))
        .filter_map(|part| part["text"].as_str())
        .collect();
    (!text.trim().is_empty()).then_some(text)
}

fn finish_reason(reply: &Value) -> &str {
    reply["candidates"][0]["finishReason"]
        .as_str()
        .unwrap_or("no candidates")
}

/// Claude's continuation with the prefilled brace put back in front.
fn anthropic_text(reply: &Value) -> Option<String> {
    let tail: String = reply["content"]
        .as_array()?
        .iter()
        .filter(|block| block["type"] == "text")
        .filter_map(|block| block["text"].as_str())
        .collect();
    if tail.trim().is_empty() {
        return None;
    }
    // Some models repeat the prefill anyway.
    if tail.trim_start().starts_with(JSON_PREFILL) {
        Some(tail)
    } else {
        Some(format!("{}{}", JSON_PREFILL, tail))
    }
}

/// LLM client error.
#[derive(Debug, Clone, Display, Error)]
#[display("LLM error: {} at {}:{}", message, file, line)]
pub struct LlmError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl LlmError {
    /// Creates a new LLM error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        error!(error_message = %message, "LLM error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_requires_integer_coordinates() {
        let schema = move_schema(15);
        assert_eq!(schema["properties"]["row"]["type"], "INTEGER");
        assert_eq!(schema["properties"]["col"]["type"], "INTEGER");
        assert_eq!(schema["properties"]["reasoning"]["type"], "STRING");
        assert_eq!(schema["required"], json!(["row", "col"]));
        assert_eq!(schema["properties"]["row"]["description"], "The row index (0-14)");
    }

    #[test]
    fn test_gemini_text_skips_thoughts() {
        let reply = json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "weighing the open three", "thought": true },
                    { "text": "{\"row\": 7, " },
                    { "text": "\"col\": 8}" }
                ]},
                "finishReason": "STOP"
            }]
        });
        assert_eq!(gemini_text(&reply).as_deref(), Some("{\"row\": 7, \"col\": 8}"));
    }

    #[test]
    fn test_gemini_without_text() {
        let reply = json!({ "candidates": [{ "finishReason": "MAX_TOKENS" }] });
        assert_eq!(gemini_text(&reply), None);
        assert_eq!(finish_reason(&reply), "MAX_TOKENS");
        assert_eq!(finish_reason(&json!({})), "no candidates");
    }

    #[test]
    fn test_anthropic_prefill_restored() {
        let reply = json!({
            "content": [{ "type": "text", "text": "\"row\": 3, \"col\": 4}" }]
        });
        assert_eq!(
            anthropic_text(&reply).as_deref(),
            Some("{\"row\": 3, \"col\": 4}")
        );

        let echoed = json!({
            "content": [{ "type": "text", "text": "{\"row\": 3, \"col\": 4}" }]
        });
        assert_eq!(
            anthropic_text(&echoed).as_deref(),
            Some("{\"row\": 3, \"col\": 4}")
        );
        assert_eq!(anthropic_text(&json!({ "content": [] })), None);
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = LlmConfig::new(
            LlmProvider::Gemini,
            "secret-key".to_string(),
            "gemini-2.5-pro".to_string(),
            1024,
        );
        assert!(!format!("{:?}", config).contains("secret-key"));
    }
}
