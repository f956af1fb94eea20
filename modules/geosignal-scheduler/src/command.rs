/// The scheduler's internal control channel (§6): `{run_fetch(source_set?),
/// run_enrich, run_integrator(name), run_consolidate, reload_sources,
/// shutdown}`. Distinct from the timed triggers — this is how an operator
/// or the Query API's admin surface forces an out-of-band run.
#[derive(Debug, Clone)]
pub enum Command {
    RunFetch(Option<Vec<String>>),
    RunEnrich,
    RunIntegrator(String),
    RunConsolidate,
    ReloadSources,
    Shutdown,
}
