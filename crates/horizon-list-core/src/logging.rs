//! Logging facilities for Horizon List.
//!
//! Horizon List uses the `tracing` crate for instrumentation. The library never
//! installs a subscriber; applications (and tests) choose their own:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_list=debug,horizon_list_core=info")
//!     .init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core primitives target.
    pub const CORE: &str = "horizon_list_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_list_core::signal";
    /// Step queue target.
    pub const QUEUE: &str = "horizon_list_core::queue";
    /// Backing collection target.
    pub const COLLECTION: &str = "horizon_list::collection";
    /// Panel lifecycle and rendering target.
    pub const PANEL: &str = "horizon_list::panel";
    /// Selection bookkeeping target.
    pub const SELECTION: &str = "horizon_list::selection";
    /// Visual effects target.
    pub const FX: &str = "horizon_list::fx";
}

/// Install a `tracing` subscriber for tests.
///
/// Respects `RUST_LOG`; repeated calls are harmless.
#[cfg(test)]
pub(crate) fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
