#[derive(Debug, thiserror::Error)]
pub enum IntegratorError {
    #[error("fetch error: {0}")]
    Fetch(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("schema mismatch: {0}")]
    Schema(String),

    #[error("storage error: {0}")]
    Storage(#[from] geosignal_store::StoreError),
}

impl From<IntegratorError> for geosignal_common::GeoSignalError {
    fn from(err: IntegratorError) -> Self {
        match err {
            IntegratorError::Fetch(cause) => {
                geosignal_common::GeoSignalError::Fetch { host: "integrator".to_string(), cause }
            }
            IntegratorError::Parse(cause) => {
                geosignal_common::GeoSignalError::Parse { source: "integrator".to_string(), cause }
            }
            IntegratorError::Schema(cause) => geosignal_common::GeoSignalError::Schema(cause),
            IntegratorError::Storage(e) => geosignal_common::GeoSignalError::Storage(e.to_string()),
        }
    }
}
