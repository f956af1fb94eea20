mod client;
mod types;

use async_trait::async_trait;

use crate::error::AiClientError;
use crate::traits::TextProvider;

use client::ClaudeClient;

/// Anthropic's native Messages API. Structured extraction goes through forced
/// tool use rather than a `response_format` field, since Claude has no
/// equivalent of OpenAI's JSON-schema response mode.
#[derive(Clone)]
pub struct Claude {
    api_key: String,
    model: String,
    base_url: Option<String>,
}

impl Claude {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), model: model.into(), base_url: None }
    }

    pub fn from_env(model: impl Into<String>) -> Result<Self, AiClientError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| AiClientError::EmptyResponse("claude"))?;
        Ok(Self::new(api_key, model))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    fn client(&self) -> ClaudeClient {
        let client = ClaudeClient::new(&self.api_key);
        match &self.base_url {
            Some(url) => client.with_base_url(url),
            None => client,
        }
    }
}

#[async_trait]
impl TextProvider for Claude {
    fn name(&self) -> &'static str {
        "claude"
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, AiClientError> {
        self.client().chat(&self.model, system, user).await
    }

    async fn extract_json(
        &self,
        system: &str,
        user: &str,
        schema: serde_json::Value,
    ) -> Result<String, AiClientError> {
        self.client().structured(&self.model, system, user, schema).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claude_new() {
        let claude = Claude::new("sk-ant-test", "claude-3-5-sonnet-latest");
        assert_eq!(TextProvider::name(&claude), "claude");
    }

    #[test]
    fn test_claude_with_base_url() {
        let claude = Claude::new("sk-ant-test", "claude-3-5-sonnet-latest")
            .with_base_url("http://localhost:9000");
        assert_eq!(claude.base_url.as_deref(), Some("http://localhost:9000"));
    }
}
