use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use crate::error::AiClientError;

use super::types::*;

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1";

pub(crate) struct OpenRouterClient {
    api_key: String,
    http: reqwest::Client,
    app_name: Option<String>,
}

impl OpenRouterClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            http: reqwest::Client::new(),
            app_name: None,
        }
    }

    pub fn with_app_name(mut self, name: &str) -> Self {
        self.app_name = Some(name.to_string());
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
        if let Some(name) = &self.app_name {
            if let Ok(val) = HeaderValue::from_str(name) {
                headers.insert("X-Title", val);
            }
        }
        headers
    }

    pub async fn chat(&self, model: &str, system: &str, user: &str) -> Result<String, AiClientError> {
        let url = format!("{}/chat/completions", OPENROUTER_API_URL);
        let request = ChatRequest {
            model: model.to_string(),
            messages: vec![WireMessage::system(system), WireMessage::user(user)],
            temperature: Some(0.0),
            response_format: None,
        };

        debug!(model, provider = "openrouter", "chat request");
        let response = self.http.post(&url).headers(self.headers()).json(&request).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AiClientError::Http { provider: "openrouter", status, body });
        }
        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty())
            .ok_or(AiClientError::EmptyResponse("openrouter"))
    }

    pub async fn structured(
        &self,
        model: &str,
        system: &str,
        user: &str,
        schema: serde_json::Value,
    ) -> Result<String, AiClientError> {
        let url = format!("{}/chat/completions", OPENROUTER_API_URL);
        let request = ChatRequest {
            model: model.to_string(),
            messages: vec![WireMessage::system(system), WireMessage::user(user)],
            temperature: Some(0.0),
            response_format: Some(ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: "structured_response",
                    strict: true,
                    schema,
                },
            }),
        };

        debug!(model, provider = "openrouter", "structured output request");
        let response = self.http.post(&url).headers(self.headers()).json(&request).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AiClientError::Http { provider: "openrouter", status, body });
        }
        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty())
            .ok_or(AiClientError::EmptyResponse("openrouter"))
    }
}
