//! Diagnostics port - non-fatal observability events

use crate::domain::LogEvent;

/// Sink for recovered failures
///
/// Reporting must never fail toward the caller: implementations swallow
/// their own errors.
pub trait Diagnostics: Send + Sync {
    fn warn(&self, event: LogEvent);
}

/// Diagnostics that only emit a `tracing` warning
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warn(&self, event: LogEvent) {
        tracing::warn!(
            event = %event.event,
            command = event.command.as_deref().unwrap_or(""),
            error = event.error_message.as_deref().unwrap_or(""),
            details = event.error_details.as_deref().unwrap_or(""),
            "recovered failure"
        );
    }
}
