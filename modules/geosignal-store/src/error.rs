pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("stale claim on article {0}")]
    StaleClaim(uuid::Uuid),

    #[error("article not found: {0}")]
    NotFound(uuid::Uuid),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<StoreError> for geosignal_common::GeoSignalError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::StaleClaim(id) => geosignal_common::GeoSignalError::StaleClaim(id),
            other => geosignal_common::GeoSignalError::Storage(other.to_string()),
        }
    }
}
