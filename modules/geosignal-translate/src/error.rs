#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("provider error ({provider}): {cause}")]
    Provider { provider: String, cause: String },

    #[error("all translation providers failed")]
    AllProvidersFailed,
}

impl From<TranslateError> for geosignal_common::GeoSignalError {
    fn from(err: TranslateError) -> Self {
        match err {
            TranslateError::Provider { provider, cause } => {
                geosignal_common::GeoSignalError::Provider { provider, cause }
            }
            TranslateError::AllProvidersFailed => geosignal_common::GeoSignalError::AllProvidersFailed,
        }
    }
}
