//! The log sink contract (§6). Concrete venue wire formats and the log
//! backend itself are external collaborators; this crate only defines the
//! shape other components depend on.

/// Three-level line logger. Implementations are expected to timestamp each
/// line with local wall-clock time to second precision.
pub trait LogSink: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards to the `tracing` ecosystem; the installed subscriber (see
/// `arb-cli`) controls formatting and timestamping.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}
