use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use crate::error::AiClientError;

use super::types::*;

const OPENAI_API_URL: &str = "https://api.openai.com/v1";

pub(crate) struct OpenAiClient {
    api_key: String,
    http: reqwest::Client,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            http: reqwest::Client::new(),
            base_url: OPENAI_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .unwrap_or_else(|_| HeaderValue::from_static("")),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    pub async fn chat(&self, model: &str, system: &str, user: &str) -> Result<String, AiClientError> {
        let url = format!("{}/chat/completions", self.base_url);
        let mut request = ChatRequest {
            model: model.to_string(),
            messages: vec![WireMessage::system(system), WireMessage::user(user)],
            temperature: None,
            max_tokens: None,
        };
        if uses_max_completion_tokens(model) {
            request.max_tokens = Some(4096);
        } else {
            request.temperature = Some(0.0);
            request.max_tokens = Some(4096);
        }

        debug!(model, provider = "openai", "chat request");
        let response = self.http.post(&url).headers(self.headers()).json(&request).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AiClientError::Http { provider: "openai", status, body });
        }
        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty())
            .ok_or(AiClientError::EmptyResponse("openai"))
    }

    pub async fn structured(
        &self,
        model: &str,
        system: &str,
        user: &str,
        schema: serde_json::Value,
    ) -> Result<String, AiClientError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = StructuredRequest {
            model: model.to_string(),
            messages: vec![WireMessage::system(system), WireMessage::user(user)],
            temperature: if uses_max_completion_tokens(model) { None } else { Some(0.0) },
            response_format: ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: "structured_response",
                    strict: true,
                    schema,
                },
            },
        };

        debug!(model, provider = "openai", "structured output request");
        let response = self.http.post(&url).headers(self.headers()).json(&request).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AiClientError::Http { provider: "openai", status, body });
        }
        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty())
            .ok_or(AiClientError::EmptyResponse("openai"))
    }

    pub async fn embed(&self, model: &str, text: &str) -> Result<Vec<f32>, AiClientError> {
        self.embed_batch(model, &[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or(AiClientError::EmptyResponse("openai"))
    }

    pub async fn embed_batch(&self, model: &str, texts: &[String]) -> Result<Vec<Vec<f32>>, AiClientError> {
        let url = format!("{}/embeddings", self.base_url);
        let request = EmbeddingRequest {
            model: model.to_string(),
            input: serde_json::Value::Array(
                texts.iter().map(|t| serde_json::Value::String(t.clone())).collect(),
            ),
        };
        let response = self.http.post(&url).headers(self.headers()).json(&request).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AiClientError::Http { provider: "openai", status, body });
        }
        let parsed: EmbeddingResponse = response.json().await?;
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}
