use geosignal_common::quality::risk_level_for_score;
use geosignal_common::{EntityMap, RiskLevel};

const EVENT_TYPE_KEYWORDS: &[&str] = &[
    "missile", "strike", "strikes", "airstrike", "bombing", "bombed", "shelling",
    "shelled", "invasion", "massacre", "offensive", "explosion", "ambush",
    "assassination", "coup", "insurgency", "siege",
];

/// Risk classification (§4.5 step 6). Combines four signals into a single
/// `[0,1]` score: conflict-entity presence, negative sentiment strength,
/// event-type keyword density, and an optional external model probability
/// (the consolidator's AI amplification, or a dedicated classifier
/// endpoint). When the external signal is absent its share of the weight is
/// redistributed over the remaining three rather than left on the floor, so
/// a strongly-worded article can still reach `critical` without one.
pub fn classify_risk(
    canonical_text: &str,
    sentiment_score: f32,
    entities: &EntityMap,
    external_probability: Option<f32>,
) -> (RiskLevel, f32) {
    let conflict_entity_signal = if entities.locations.is_empty()
        && entities.persons.is_empty()
        && entities.organizations.is_empty()
    {
        0.0
    } else {
        1.0
    };

    let negative_sentiment_signal = (-sentiment_score).clamp(0.0, 1.0);
    let event_type_signal = event_keyword_density(canonical_text);

    const W_ENTITY: f32 = 0.2;
    const W_SENTIMENT: f32 = 0.3;
    const W_EVENT: f32 = 0.4;
    const W_EXTERNAL: f32 = 0.1;

    let (score, total_weight) = match external_probability {
        Some(external) => (
            W_ENTITY * conflict_entity_signal
                + W_SENTIMENT * negative_sentiment_signal
                + W_EVENT * event_type_signal
                + W_EXTERNAL * external,
            W_ENTITY + W_SENTIMENT + W_EVENT + W_EXTERNAL,
        ),
        None => (
            W_ENTITY * conflict_entity_signal + W_SENTIMENT * negative_sentiment_signal + W_EVENT * event_type_signal,
            W_ENTITY + W_SENTIMENT + W_EVENT,
        ),
    };

    let risk_score = (score / total_weight).clamp(0.0, 1.0);
    (risk_level_for_score(risk_score), risk_score)
}

fn event_keyword_density(text: &str) -> f32 {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();
    if words.is_empty() {
        return 0.0;
    }
    let hits = words
        .iter()
        .filter(|w| {
            let trimmed = w.trim_matches(|c: char| !c.is_alphanumeric());
            EVENT_TYPE_KEYWORDS.contains(&trimmed)
        })
        .count() as f32;
    (hits / words.len() as f32 * 5.0).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities_with_location() -> EntityMap {
        EntityMap { persons: vec![], organizations: vec![], locations: vec!["country Y".to_string()], misc: vec![] }
    }

    #[test]
    fn missile_strike_scenario_meets_the_spec_floor() {
        let text = "Missile strike in city X, country Y, kills 12";
        let sentiment = crate::sentiment::score_sentiment(text);
        let (level, score) = classify_risk(text, sentiment, &entities_with_location(), None);
        assert!(score >= 0.6, "expected risk_score >= 0.6, got {score}");
        assert!(matches!(level, RiskLevel::High | RiskLevel::Critical));
    }

    #[test]
    fn neutral_article_with_no_entities_scores_low() {
        let text = "The city council approved next year's budget after a lengthy debate";
        let (level, score) = classify_risk(text, 0.0, &EntityMap::default(), None);
        assert_eq!(level, RiskLevel::Low);
        assert!(score < 0.4);
    }

    #[test]
    fn external_probability_can_push_score_into_critical() {
        let text = "Massive offensive launched overnight with heavy shelling reported";
        let (level, _score) = classify_risk(text, -0.5, &entities_with_location(), Some(1.0));
        assert_eq!(level, RiskLevel::Critical);
    }

    #[test]
    fn score_is_always_within_bounds() {
        let (_, score) = classify_risk("", 1.0, &EntityMap::default(), Some(1.0));
        assert!((0.0..=1.0).contains(&score));
    }
}
