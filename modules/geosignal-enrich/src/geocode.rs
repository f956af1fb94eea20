use async_trait::async_trait;
use serde::Deserialize;

/// A resolved place: everything §4.5 step 4 needs to fill `country`,
/// `region`, `latitude`, `longitude` on an article.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlace {
    pub country: String,
    pub region: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

/// `name → {lat, lon, country, region} | not_found` (§6). A thin trait so
/// the enricher can be exercised in tests against an in-memory fixture
/// instead of a live geocoding service.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, place_name: &str) -> Result<Option<ResolvedPlace>, ai_client::AiClientError>;
}

#[derive(Deserialize)]
struct GeocodeResponse {
    lat: f64,
    lon: f64,
    country: String,
    region: Option<String>,
}

/// HTTP-backed geocoder speaking the §6 contract against a single endpoint
/// (by default a Nominatim-compatible service, configured via
/// `geocoder_base_url`).
pub struct HttpGeocoder {
    base_url: String,
    http: reqwest::Client,
    timeout: std::time::Duration,
}

impl HttpGeocoder {
    pub fn new(base_url: impl Into<String>, timeout: std::time::Duration) -> Self {
        Self { base_url: base_url.into(), http: reqwest::Client::new(), timeout }
    }
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    async fn resolve(&self, place_name: &str) -> Result<Option<ResolvedPlace>, ai_client::AiClientError> {
        let url = format!("{}/resolve", self.base_url.trim_end_matches('/'));
        let response = self
            .http
            .get(&url)
            .query(&[("name", place_name)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(ai_client::AiClientError::Transport)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ai_client::AiClientError::Http { provider: "geocoder", status, body });
        }

        let parsed: GeocodeResponse = response.json().await.map_err(ai_client::AiClientError::Transport)?;
        Ok(Some(ResolvedPlace {
            country: parsed.country,
            region: parsed.region,
            lat: parsed.lat,
            lon: parsed.lon,
        }))
    }
}

/// Picks the primary location entity out of the set extracted by NER, per
/// §4.5 step 4's three-rule cascade. `title` and `body` are the canonical
/// (translated) texts; `locations` preserves extraction order for rule (iii).
pub fn select_primary_location<'a>(locations: &'a [String], title: &str, body: &str) -> Option<&'a str> {
    if locations.is_empty() {
        return None;
    }

    // Rule (i): highest mention frequency in the body.
    let body_lower = body.to_lowercase();
    let mut best: Option<(&str, usize)> = None;
    for loc in locations {
        let count = body_lower.matches(&loc.to_lowercase()).count();
        if count > 0 && best.map(|(_, n)| count > n).unwrap_or(true) {
            best = Some((loc.as_str(), count));
        }
    }
    if let Some((loc, _)) = best {
        return Some(loc);
    }

    // Rule (ii): mentioned in the title.
    let title_lower = title.to_lowercase();
    if let Some(loc) = locations.iter().find(|loc| title_lower.contains(&loc.to_lowercase())) {
        return Some(loc.as_str());
    }

    // Rule (iii): first extracted location.
    locations.first().map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_location_with_highest_body_frequency() {
        let locations = vec!["Kharkiv".to_string(), "Kyiv".to_string()];
        let body = "Kharkiv was hit. Kharkiv residents fled. Kyiv issued a statement.";
        let picked = select_primary_location(&locations, "Attack reported", body);
        assert_eq!(picked, Some("Kharkiv"));
    }

    #[test]
    fn falls_back_to_title_match_when_body_frequencies_tie() {
        let locations = vec!["Odesa".to_string(), "Lviv".to_string()];
        let body = "Shelling continued overnight across the region.";
        let picked = select_primary_location(&locations, "Lviv under attack", body);
        assert_eq!(picked, Some("Lviv"));
    }

    #[test]
    fn falls_back_to_first_location_with_no_other_signal() {
        let locations = vec!["Mariupol".to_string(), "Kherson".to_string()];
        let picked = select_primary_location(&locations, "Overnight strikes", "No location named directly.");
        assert_eq!(picked, Some("Mariupol"));
    }

    #[test]
    fn no_locations_returns_none() {
        assert_eq!(select_primary_location(&[], "title", "body"), None);
    }
}
