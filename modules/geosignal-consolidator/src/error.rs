#[derive(Debug, thiserror::Error)]
pub enum ConsolidateError {
    #[error("storage error: {0}")]
    Storage(#[from] geosignal_store::StoreError),
}

impl From<ConsolidateError> for geosignal_common::GeoSignalError {
    fn from(err: ConsolidateError) -> Self {
        match err {
            ConsolidateError::Storage(e) => geosignal_common::GeoSignalError::Storage(e.to_string()),
        }
    }
}
