#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("fetch error for host {host}: {cause}")]
    Fetch { host: String, cause: String },

    #[error("parse error for source {source}: {cause}")]
    Parse { source: String, cause: String },

    #[error("rate limited by {host}, retry after {retry_after_secs}s")]
    RateLimited { host: String, retry_after_secs: u64 },

    #[error("storage error: {0}")]
    Storage(#[from] geosignal_store::StoreError),
}

impl From<FetchError> for geosignal_common::GeoSignalError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Fetch { host, cause } => geosignal_common::GeoSignalError::Fetch { host, cause },
            FetchError::Parse { source, cause } => geosignal_common::GeoSignalError::Parse { source, cause },
            FetchError::RateLimited { host, retry_after_secs } => {
                geosignal_common::GeoSignalError::RateLimited { host, retry_after_secs }
            }
            FetchError::Storage(e) => geosignal_common::GeoSignalError::Storage(e.to_string()),
        }
    }
}
