//! Log event structure

use super::formatter;
use super::log_level::LogLevel;
use chrono::{DateTime, Local};

/// Where a logging call was made.
///
/// Usually built with [`call_site!`](crate::call_site), which fills in
/// `file!()`, `line!()` and the enclosing function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
    pub function: Option<&'static str>,
}

impl CallSite {
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self {
            file,
            line,
            function: None,
        }
    }

    #[must_use]
    pub const fn with_function(mut self, function: &'static str) -> Self {
        self.function = Some(function);
        self
    }

    /// `<basename>[<line>]`
    pub fn position(&self) -> String {
        formatter::format_position(self.file, self.line)
    }

    pub fn basename(&self) -> &'static str {
        formatter::basename(self.file)
    }
}

/// A single event as handed to every sink.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub level: LogLevel,
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub position: String,
}

impl LogEvent {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// so one event always renders as one line.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    /// Capture an event now, at `site`
    pub fn new(level: LogLevel, site: &CallSite, message: impl Into<String>) -> Self {
        Self::at(Local::now(), level, site.position(), message)
    }

    /// Build an event with an explicit timestamp and position
    pub fn at(
        timestamp: DateTime<Local>,
        level: LogLevel,
        position: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            timestamp,
            message: Self::sanitize_message(&message.into()),
            position: position.into(),
        }
    }

    /// The console/file rendering of this event
    pub fn render_line(&self) -> String {
        formatter::format_line(&self.timestamp, self.level, &self.position, &self.message)
    }

    /// The remote form body of this event
    pub fn render_remote_body(&self, identifier: &str) -> String {
        formatter::format_remote_body(
            &self.timestamp,
            self.level,
            &self.position,
            &self.message,
            identifier,
        )
    }
}
