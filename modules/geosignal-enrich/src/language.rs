/// Heuristic language detection (§4.5 step 1). Deliberately not a full
/// statistical model: scripts outside Latin are identified by Unicode block,
/// and Latin-script text is narrowed by stopword overlap against a small set
/// of common languages. Anything inconclusive falls back to the caller's
/// default (normally the source's configured language).
pub fn detect_language(text: &str, default: &str) -> (String, f32) {
    if text.trim().is_empty() {
        return (default.to_string(), 0.0);
    }

    if let Some(script_lang) = detect_by_script(text) {
        return (script_lang.to_string(), 0.9);
    }

    detect_by_stopwords(text).unwrap_or_else(|| (default.to_string(), 0.0))
}

fn detect_by_script(text: &str) -> Option<&'static str> {
    let mut cyrillic = 0usize;
    let mut arabic = 0usize;
    let mut cjk = 0usize;
    let mut letters = 0usize;

    for c in text.chars() {
        if !c.is_alphabetic() {
            continue;
        }
        letters += 1;
        match c as u32 {
            0x0400..=0x04FF => cyrillic += 1,
            0x0600..=0x06FF => arabic += 1,
            0x4E00..=0x9FFF | 0x3040..=0x30FF => cjk += 1,
            _ => {}
        }
    }

    if letters == 0 {
        return None;
    }

    let dominant = [("ru", cyrillic), ("ar", arabic), ("zh", cjk)]
        .into_iter()
        .max_by_key(|(_, count)| *count)?;

    if dominant.1 * 2 > letters {
        Some(dominant.0)
    } else {
        None
    }
}

const STOPWORDS: &[(&str, &[&str])] = &[
    ("en", &["the", "and", "of", "to", "in", "a", "is", "that"]),
    ("es", &["el", "la", "de", "que", "y", "en", "los", "un"]),
    ("fr", &["le", "la", "de", "et", "les", "des", "un", "une"]),
    ("de", &["der", "die", "und", "das", "ist", "den", "ein", "zu"]),
    ("pt", &["o", "a", "de", "que", "e", "do", "da", "em"]),
];

fn detect_by_stopwords(text: &str) -> Option<(String, f32)> {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().take(200).collect();
    if words.is_empty() {
        return None;
    }

    let mut best: Option<(&str, usize)> = None;
    for (lang, stopwords) in STOPWORDS {
        let hits = words.iter().filter(|w| stopwords.contains(w)).count();
        if best.map(|(_, best_hits)| hits > best_hits).unwrap_or(hits > 0) {
            best = Some((lang, hits));
        }
    }

    best.map(|(lang, hits)| {
        let confidence = (hits as f32 / words.len() as f32 * 5.0).min(1.0);
        (lang.to_string(), confidence)
    })
    .filter(|(_, confidence)| *confidence > 0.15)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cyrillic_text_detected_as_russian() {
        let (lang, confidence) = detect_language("Ракетный удар по городу", "en");
        assert_eq!(lang, "ru");
        assert!(confidence > 0.5);
    }

    #[test]
    fn english_stopwords_detected() {
        let (lang, _) = detect_language(
            "The missile strike in the city killed dozens and the government condemned the attack",
            "fr",
        );
        assert_eq!(lang, "en");
    }

    #[test]
    fn empty_text_falls_back_to_default() {
        let (lang, confidence) = detect_language("", "ar");
        assert_eq!(lang, "ar");
        assert_eq!(confidence, 0.0);
    }

    #[test]
    fn inconclusive_text_falls_back_to_default() {
        let (lang, _) = detect_language("12345 !!! ***", "en");
        assert_eq!(lang, "en");
    }
}
