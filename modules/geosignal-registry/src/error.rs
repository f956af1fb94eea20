#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate feed_url in source catalog: {0}")]
    DuplicateFeedUrl(String),

    #[error("source catalog entry missing required field: {0}")]
    MissingField(String),

    #[error("failed to parse source catalog: {0}")]
    Parse(String),
}
