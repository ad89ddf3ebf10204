//! Sink trait for log output destinations

use super::{
    error::{LoggerError, Result},
    log_event::LogEvent,
    session_config::{SessionConfig, SinkKind},
};

/// A delivery channel driven by its own worker thread.
///
/// `deliver` is only called for events that passed the sink's gate. An `Err`
/// switches the sink off for the rest of the process and is reported as an
/// Error event through the logger.
pub trait Sink: Send {
    fn kind(&self) -> SinkKind;

    /// Write one event using the configuration captured when it was logged
    fn deliver(&mut self, event: &LogEvent, config: &SessionConfig) -> Result<()>;

    /// Message logged when a delivery fails and the sink is disabled
    fn failure_notice(&self, _error: &LoggerError) -> String {
        format!(
            "Unable to log to {} sink - disabling {}-logging",
            self.kind(),
            self.kind()
        )
    }

    /// Whether the failure is also logged as an error object after the notice
    fn reports_error_object(&self, error: &LoggerError) -> bool {
        !matches!(error, LoggerError::HttpStatus { .. })
    }
}
