use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use tracing::debug;

use crate::error::AiClientError;

use super::types::*;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 4096;

pub(crate) struct ClaudeClient {
    api_key: String,
    http: reqwest::Client,
    base_url: String,
}

impl ClaudeClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            http: reqwest::Client::new(),
            base_url: ANTHROPIC_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key).unwrap_or_else(|_| HeaderValue::from_static("")),
        );
        headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    pub async fn chat(&self, model: &str, system: &str, user: &str) -> Result<String, AiClientError> {
        let url = format!("{}/messages", self.base_url);
        let request = ChatRequest {
            model: model.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            system: Some(system.to_string()),
            messages: vec![WireMessage::user(user)],
            temperature: Some(0.0),
            tools: None,
            tool_choice: None,
        };

        debug!(model, provider = "claude", "chat request");
        let response = self.http.post(&url).headers(self.headers()).json(&request).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AiClientError::Http { provider: "claude", status, body });
        }
        let parsed: ChatResponse = response.json().await?;
        parsed.text().filter(|t| !t.is_empty()).ok_or(AiClientError::EmptyResponse("claude"))
    }

    /// Forces tool use to coerce a JSON-schema-shaped reply out of a model
    /// that otherwise only speaks prose. The tool's input schema *is* the
    /// schema the caller asked for; the tool call's `input` is the answer.
    pub async fn structured(
        &self,
        model: &str,
        system: &str,
        user: &str,
        schema: serde_json::Value,
    ) -> Result<String, AiClientError> {
        let url = format!("{}/messages", self.base_url);
        let tool = ToolDefinitionWire {
            name: "emit_structured_response".to_string(),
            description: "Emit the response matching the required schema.".to_string(),
            input_schema: schema,
        };
        let request = ChatRequest {
            model: model.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            system: Some(system.to_string()),
            messages: vec![WireMessage::user(user)],
            temperature: Some(0.0),
            tools: Some(vec![tool]),
            tool_choice: Some(serde_json::json!({
                "type": "tool",
                "name": "emit_structured_response",
            })),
        };

        debug!(model, provider = "claude", "structured output request");
        let response = self.http.post(&url).headers(self.headers()).json(&request).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AiClientError::Http { provider: "claude", status, body });
        }
        let parsed: ChatResponse = response.json().await?;
        let input = parsed.content.into_iter().find_map(|b| match b {
            ContentBlock::ToolUse { input } => Some(input),
            _ => None,
        });
        match input {
            Some(value) => Ok(value.to_string()),
            None => Err(AiClientError::EmptyResponse("claude")),
        }
    }
}
