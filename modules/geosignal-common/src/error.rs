use thiserror::Error;

/// Error kinds shared across every pipeline component. Individual crates may
/// define narrower errors for their own internals, but anything that crosses
/// a component boundary is converted into one of these variants so the
/// supervisor can apply a single propagation policy (§7).
#[derive(Error, Debug)]
pub enum GeoSignalError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("fetch error for host {host}: {cause}")]
    Fetch { host: String, cause: String },

    #[error("parse error for source {source}: {cause}")]
    Parse { source: String, cause: String },

    #[error("rate limited by {host}, retry after {retry_after_secs}s")]
    RateLimited { host: String, retry_after_secs: u64 },

    #[error("provider error ({provider}): {cause}")]
    Provider { provider: String, cause: String },

    #[error("schema mismatch: {0}")]
    Schema(String),

    #[error("stale claim on article {0}")]
    StaleClaim(uuid::Uuid),

    #[error("operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("all translation/LLM providers failed for this request")]
    AllProvidersFailed,

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl GeoSignalError {
    /// Whether this error kind is recovered locally (logged, counted, loop
    /// continues) or must surface upward per §7's propagation policy.
    pub fn is_locally_recoverable(&self) -> bool {
        matches!(
            self,
            GeoSignalError::Fetch { .. }
                | GeoSignalError::Parse { .. }
                | GeoSignalError::RateLimited { .. }
                | GeoSignalError::Provider { .. }
                | GeoSignalError::Timeout(_)
                | GeoSignalError::StaleClaim(_)
        )
    }

    /// Process exit code per §6, for errors observed at the supervisor boundary.
    pub fn exit_code(&self) -> i32 {
        match self {
            GeoSignalError::Config(_) => 1,
            GeoSignalError::Storage(_) => 2,
            GeoSignalError::Schema(_) => 3,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_exits_one() {
        assert_eq!(GeoSignalError::Config("missing DATABASE_URL".into()).exit_code(), 1);
    }

    #[test]
    fn fetch_error_is_locally_recoverable() {
        let err = GeoSignalError::Fetch { host: "example.com".into(), cause: "timeout".into() };
        assert!(err.is_locally_recoverable());
    }

    #[test]
    fn storage_error_is_not_locally_recoverable() {
        let err = GeoSignalError::Storage("pool exhausted".into());
        assert!(!err.is_locally_recoverable());
    }
}
