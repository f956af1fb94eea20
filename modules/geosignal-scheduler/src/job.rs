use async_trait::async_trait;
use geosignal_common::{CancelToken, GeoSignalError};

/// One schedulable unit of work. Every component the scheduler can trigger
/// — a fetch batch, an enrich batch, an integrator run, a consolidation
/// pass — is wrapped in one of these rather than the scheduler matching on
/// component type (§4.8 names the properties, not the components).
#[async_trait]
pub trait Job: Send + Sync {
    fn name(&self) -> &str;
    async fn run(&self, stop: CancelToken) -> Result<(), GeoSignalError>;
}
