#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    #[error("storage error: {0}")]
    Storage(#[from] geosignal_store::StoreError),

    #[error("operation timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl From<EnrichError> for geosignal_common::GeoSignalError {
    fn from(err: EnrichError) -> Self {
        match err {
            EnrichError::Storage(e) => geosignal_common::GeoSignalError::Storage(e.to_string()),
            EnrichError::Timeout(d) => geosignal_common::GeoSignalError::Timeout(d),
        }
    }
}
