mod client;
mod types;

use async_trait::async_trait;

use crate::error::AiClientError;
use crate::traits::TextProvider;

use client::OpenRouterClient;

/// OpenRouter: a single API surface fronting many third-party models.
/// Used in the translation/consolidator provider chains as a secondary or
/// tertiary fallback tier — a model swap is a config change, not a redeploy.
#[derive(Clone)]
pub struct OpenRouter {
    api_key: String,
    model: String,
    app_name: Option<String>,
}

impl OpenRouter {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            app_name: None,
        }
    }

    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    fn client(&self) -> OpenRouterClient {
        let client = OpenRouterClient::new(&self.api_key);
        match &self.app_name {
            Some(name) => client.with_app_name(name),
            None => client,
        }
    }
}

#[async_trait]
impl TextProvider for OpenRouter {
    fn name(&self) -> &'static str {
        "openrouter"
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
