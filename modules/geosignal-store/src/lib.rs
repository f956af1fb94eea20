mod error;
mod filter;
mod rows;
mod store;

pub use error::{Result, StoreError};
pub use filter::{ArticleFilter, InsertOutcome, ZoneFilter};
pub use rows::EnrichmentFields;
pub use store::{AggregateBy, ArticleStore};
