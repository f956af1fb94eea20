use serde::Deserialize;

use geosignal_common::{Priority, Protocol, Source};

/// On-disk shape of a single catalog entry. Kept separate from `Source` so
/// the registry can validate and normalize before constructing the domain
/// type (e.g. defaulting `enabled`).
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub feed_url: String,
    pub protocol: Protocol,
    pub language: String,
    pub country: String,
    pub region: String,
    pub priority: Priority,
    #[serde(default)]
    pub conflict_zone_tag: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl CatalogEntry {
    pub fn into_source(self) -> Source {
        Source {
            name: self.name,
            feed_url: self.feed_url,
            protocol: self.protocol,
            language: self.language,
            country: self.country,
            region: self.region,
            priority: self.priority,
            conflict_zone_tag: self.conflict_zone_tag,
            enabled: self.enabled,
        }
    }
}

/// Parse a JSON array of `CatalogEntry` into `Source` values. The bundled
/// catalog ships as a JSON array; an operator may point `reload_sources` at
/// a different file with the same shape.
pub fn parse_catalog(json: &str) -> Result<Vec<Source>, crate::error::RegistryError> {
    let entries: Vec<CatalogEntry> =
        serde_json::from_str(json).map_err(|e| crate::error::RegistryError::Parse(e.to_string()))?;
    Ok(entries.into_iter().map(CatalogEntry::into_source).collect())
}
