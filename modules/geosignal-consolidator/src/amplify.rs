use std::sync::Arc;

use ai_client::TextProvider;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::warn;

/// Wire shape asked of the LLM for zone risk amplification (§4.7 "Optional
/// AI amplification"): a `critical` or `escalating` verdict adds up to
/// `+0.1`, capped at 1.0 by the caller. Failure of this step never lowers
/// the score — callers treat `None` the same as a `false` verdict.
#[derive(Debug, Deserialize, JsonSchema)]
struct AmplificationVerdict {
    risk_classification: String,
    escalating: bool,
    escalation_probability: f32,
}

/// Asks an LLM collaborator to classify a zone's risk and escalation
/// probability (§4.7). Only called for zones that already cleared
/// `final >= 0.6`; a provider failure or malformed response is logged and
/// treated as "no amplification", not an error that bubbles up.
pub async fn amplify(client: &Arc<dyn TextProvider>, summary: &str) -> f64 {
    let schema = schemars::schema_for!(AmplificationVerdict);
    let schema_json = serde_json::to_value(schema).unwrap_or_default();
    let system = "You are a geopolitical risk analyst. Given a summary of a conflict zone's \
                  contributing signals, classify its current risk_classification as one of \
                  low, medium, high, critical, and estimate whether it is escalating.";

    let raw = match client.extract_json(system, summary, schema_json).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "AI amplification call failed, leaving score unamplified");
            return 0.0;
        }
    };

    let verdict: AmplificationVerdict = match serde_json::from_str(&raw) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "AI amplification response was not valid JSON, leaving score unamplified");
            return 0.0;
        }
    };

    let is_critical = verdict.risk_classification.eq_ignore_ascii_case("critical");
    if is_critical || verdict.escalating {
        (0.1 * verdict.escalation_probability.clamp(0.0, 1.0) as f64).max(if is_critical { 0.05 } else { 0.0 }).min(0.1)
    } else {
        0.0
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
            Ok(self.response.to_string())
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
    async fn critical_verdict_adds_a_positive_bonus() {
        let client: Arc<dyn TextProvider> = Arc::new(StubProvider {
            response: r#"{"risk_classification":"critical","escalating":true,"escalation_probability":0.9}"#,
        });
        let bonus = amplify(&client, "summary").await;
        assert!(bonus > 0.0 && bonus <= 0.1);
    }

    #[tokio::test]
    async fn low_verdict_adds_nothing() {
        let client: Arc<dyn TextProvider> = Arc::new(StubProvider {
            response: r#"{"risk_classification":"low","escalating":false,"escalation_probability":0.0}"#,
        });
        let bonus = amplify(&client, "summary").await;
        assert_eq!(bonus, 0.0);
    }

    #[tokio::test]
    async fn malformed_response_never_fails_the_caller() {
        let client: Arc<dyn TextProvider> = Arc::new(StubProvider { response: "not json" });
        let bonus = amplify(&client, "summary").await;
        assert_eq!(bonus, 0.0);
    }
}
