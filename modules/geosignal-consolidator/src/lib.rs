pub mod amplify;
pub mod cluster;
pub mod consolidator;
pub mod error;
pub mod score;
pub mod signal;

pub use consolidator::{Consolidator, ConsolidatorConfig, ConsolidationStats};
pub use error::ConsolidateError;
