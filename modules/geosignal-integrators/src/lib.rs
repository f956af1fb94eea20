pub mod error;
pub mod events;
pub mod log;
pub mod risk_index;
pub mod tone;

pub use error::IntegratorError;
pub use events::EventsIntegrator;
pub use risk_index::RiskIndexIntegrator;
pub use tone::ToneIntegrator;
