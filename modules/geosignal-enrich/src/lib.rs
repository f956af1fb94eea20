pub mod enricher;
pub mod error;
pub mod geocode;
pub mod language;
pub mod ner;
pub mod risk;
pub mod sentiment;

pub use enricher::{EnricherConfig, EnricherPool, EnrichRunStats};
pub use error::EnrichError;
pub use geocode::{Geocoder, HttpGeocoder, ResolvedPlace};
pub use ner::NerExtractor;
