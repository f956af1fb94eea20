/// Deterministic lexicon-based sentiment scorer (§4.5 step 5), producing a
/// value in `[-1, 1]`. Chosen over an LLM call so the enricher's sentiment
/// step never depends on network availability and is reproducible in tests.
const NEGATIVE_WORDS: &[&str] = &[
    "killed", "kills", "killing", "dead", "deaths", "death", "strike", "strikes",
    "attack", "attacks", "attacked", "war", "invasion", "bombing", "bombed",
    "shelling", "shelled", "missile", "casualties", "wounded", "injured",
    "destroyed", "violence", "conflict", "clashes", "massacre", "terror",
    "explosion", "crisis", "crackdown", "repression", "airstrike", "offensive",
];

const POSITIVE_WORDS: &[&str] = &[
    "peace", "ceasefire", "truce", "agreement", "recovery", "rebuild", "rebuilt",
    "aid", "cooperation", "treaty", "reconciliation", "stability", "relief",
    "resolved", "diplomacy", "humanitarian", "support", "progress",
];

pub fn score_sentiment(text: &str) -> f32 {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();
    if words.is_empty() {
        return 0.0;
    }

    let negative_hits = words.iter().filter(|w| matches_any(w, NEGATIVE_WORDS)).count() as f32;
    let positive_hits = words.iter().filter(|w| matches_any(w, POSITIVE_WORDS)).count() as f32;

    if negative_hits == 0.0 && positive_hits == 0.0 {
        return 0.0;
    }

    let raw = (positive_hits - negative_hits) / (positive_hits + negative_hits).max(1.0);
    let density_scale = ((negative_hits + positive_hits) / 10.0).min(1.0).max(0.3);
    (raw * density_scale).clamp(-1.0, 1.0)
}

fn matches_any(word: &str, lexicon: &[&str]) -> bool {
    let trimmed = word.trim_matches(|c: char| !c.is_alphanumeric());
    lexicon.contains(&trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violent_headline_scores_negative() {
        let score = score_sentiment("Missile strike in city X, country Y, kills 12");
        assert!(score < 0.0, "expected negative sentiment, got {score}");
    }

    #[test]
    fn peace_agreement_scores_positive() {
        let score = score_sentiment("Ceasefire agreement brings hope for peace and recovery");
        assert!(score > 0.0, "expected positive sentiment, got {score}");
    }

    #[test]
    fn neutral_text_scores_zero() {
        let score = score_sentiment("The committee will reconvene next Tuesday to discuss the budget");
        assert_eq!(score, 0.0);
    }

    #[test]
    fn empty_text_scores_zero() {
        assert_eq!(score_sentiment(""), 0.0);
    }

    #[test]
    fn score_is_always_within_bounds() {
        let score = score_sentiment(&"killed ".repeat(50));
        assert!((-1.0..=1.0).contains(&score));
    }
}
