pub mod cache;
pub mod circuit_breaker;
pub mod error;
pub mod gateway;
pub mod provider;

pub use error::TranslateError;
pub use gateway::{TranslatedText, TranslationGateway};
pub use provider::{HttpTranslationProvider, LlmTranslationProvider, TranslationProvider};
