use std::sync::Arc;

use ai_client::TextProvider;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TranslateError;

/// A single translation backend in the provider chain (§4.4). Distinct from
/// `ai-client::TextProvider` because not every provider here is a chat
/// model: `HttpTranslationProvider` speaks the plain `POST /translate`
/// contract of §6 directly, while `LlmTranslationProvider` adapts a chat
/// model to the same interface with a translation prompt.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn translate(&self, text: &str, src_lang: &str, dst_lang: &str) -> Result<String, TranslateError>;
}

/// Adapts any `ai-client::TextProvider` (Claude, OpenAI, OpenRouter) into a
/// translation backend via a plain completion prompt.
pub struct LlmTranslationProvider {
    name: String,
    client: Arc<dyn TextProvider>,
}

impl LlmTranslationProvider {
    pub fn new(name: impl Into<String>, client: Arc<dyn TextProvider>) -> Self {
        Self { name: name.into(), client }
    }
}

#[async_trait]
impl TranslationProvider for LlmTranslationProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn translate(&self, text: &str, src_lang: &str, dst_lang: &str) -> Result<String, TranslateError> {
        let system = format!(
            "You are a precise translation engine. Translate the user's text from \
             {src_lang} to {dst_lang}. Reply with only the translation, no commentary, \
             no quotation marks, preserving paragraph breaks."
        );
        self.client
            .complete(&system, text)
            .await
            .map(|s| s.trim().to_string())
            .map_err(|e| TranslateError::Provider { provider: self.name.clone(), cause: e.to_string() })
    }
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    text: &'a str,
    src: &'a str,
    dst: &'a str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    translated_text: String,
}

/// A self-hosted or commercial machine-translation provider reachable over
/// the plain HTTP contract in §6: `POST /translate` with
/// `{text, src, dst} → {translated_text}`.
pub struct HttpTranslationProvider {
    name: String,
    base_url: String,
    http: reqwest::Client,
    timeout: std::time::Duration,
}

impl HttpTranslationProvider {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, timeout: std::time::Duration) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            http: reqwest::Client::new(),
            timeout,
        }
    }
}

#[async_trait]
impl TranslationProvider for HttpTranslationProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn translate(&self, text: &str, src_lang: &str, dst_lang: &str) -> Result<String, TranslateError> {
        let url = format!("{}/translate", self.base_url.trim_end_matches('/'));
        let response = self
            .http
            .post(&url)
            .timeout(self.timeout)
            .json(&TranslateRequest { text, src: src_lang, dst: dst_lang })
            .send()
            .await
            .map_err(|e| TranslateError::Provider { provider: self.name.clone(), cause: e.to_string() })?;

        if !response.status().is_success() {
            return Err(TranslateError::Provider {
                provider: self.name.clone(),
                cause: format!("http {}", response.status().as_u16()),
            });
        }

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| TranslateError::Provider { provider: self.name.clone(), cause: e.to_string() })?;
        Ok(parsed.translated_text)
    }
}
