use std::sync::Arc;

use ai_client::TextProvider;
use geosignal_common::EntityMap;
use schemars::JsonSchema;
use serde::Deserialize;

/// Wire shape asked of the LLM for `extract_json` (§4.5 step 3): deliberately
/// identical in shape to `EntityMap` so the parsed response can be mapped
/// across with a single `From` conversion rather than field-by-field code.
#[derive(Debug, Deserialize, JsonSchema)]
struct ExtractedEntities {
    #[serde(default)]
    persons: Vec<String>,
    #[serde(default)]
    organizations: Vec<String>,
    #[serde(default)]
    locations: Vec<String>,
    #[serde(default)]
    misc: Vec<String>,
}

impl From<ExtractedEntities> for EntityMap {
    fn from(e: ExtractedEntities) -> Self {
        EntityMap { persons: e.persons, organizations: e.organizations, locations: e.locations, misc: e.misc }
    }
}

/// Entity extractor (§4.5 step 3), backed by a structured-output LLM call.
/// Grounded in the same tool-use forcing pattern `ClaudeClient::structured`
/// uses: the model is asked to answer strictly in the shape of
/// `ExtractedEntities`.
pub struct NerExtractor {
    client: Arc<dyn TextProvider>,
}

impl NerExtractor {
    pub fn new(client: Arc<dyn TextProvider>) -> Self {
        Self { client }
    }

    pub async fn extract(&self, canonical_text: &str) -> Result<EntityMap, ai_client::AiClientError> {
        let schema = schemars::schema_for!(ExtractedEntities);
        let schema_json = serde_json::to_value(schema).unwrap_or_default();
        let system = "Extract named entities from the article text. Identify people (persons), \
                      organizations, and geopolitical or physical locations (locations). Put \
                      anything else worth naming in misc. Return only entities explicitly present \
                      in the text.";

        let raw = self.client.extract_json(system, canonical_text, schema_json).await?;
        let parsed: ExtractedEntities = serde_json::from_str(&raw).unwrap_or(ExtractedEntities {
            persons: Vec::new(),
            organizations: Vec::new(),
            locations: Vec::new(),
            misc: Vec::new(),
        });
        Ok(parsed.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StubProvider {
        response: &'static str,
    }

    #[async_trait]
    impl TextProvider for StubProvider {
        fn name(&self) -> &'static str {
            "stub"
        }
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, ai_client::AiClientError> {
            unreachable!("ner extraction only calls extract_json")
        }
        async fn extract_json(
            &self,
            _system: &str,
            _user: &str,
            _schema: serde_json::Value,
        ) -> Result<String, ai_client::AiClientError> {
            Ok(self.response.to_string())
        }
    }

    #[tokio::test]
    async fn parses_structured_entities_from_the_provider() {
        let provider = Arc::new(StubProvider {
            response: r#"{"persons":["John Doe"],"organizations":["UN"],"locations":["Kharkiv"],"misc":[]}"#,
        });
        let extractor = NerExtractor::new(provider);
        let entities = extractor.extract("John Doe of the UN visited Kharkiv.").await.unwrap();
        assert_eq!(entities.persons, vec!["John Doe"]);
        assert_eq!(entities.locations, vec!["Kharkiv"]);
    }

    #[tokio::test]
    async fn malformed_response_falls_back_to_empty_map() {
        let provider = Arc::new(StubProvider { response: "not json" });
        let extractor = NerExtractor::new(provider);
        let entities = extractor.extract("some text").await.unwrap();
        assert!(entities.persons.is_empty());
        assert!(entities.locations.is_empty());
    }
}
