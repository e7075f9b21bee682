//! Cumulative dispatch counters.

/// Counters accumulated over the life of a world. Observability only;
/// nothing in the core reads them back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchMetrics {
    /// Host events dispatched.
    pub events: u64,
    /// Node update passes run.
    pub update_passes: u64,
    /// Path broadcasts delivered.
    pub path_broadcasts: u64,
    /// Params broadcasts delivered.
    pub params_broadcasts: u64,
    /// Navigations performed (host intents and redirects).
    pub navigations: u64,
    /// Redirects raised by switches.
    pub redirects: u64,
    /// Module loads begun.
    pub loads_begun: u64,
    /// Notifications surfaced to the host.
    pub notifications: u64,
}
