//! Rendering of log events
//!
//! Every function here is pure: the same inputs always produce byte-identical
//! output, which keeps console, file and remote renderings golden-testable.

use super::log_level::LogLevel;
use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use url::form_urlencoded;

/// `yyyy-MM-dd HH:mm:ss.SSS`
pub const TIMESTAMP_PATTERN: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Content type of the body built by [`format_remote_body`]
pub const REMOTE_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Build the `<basename>[<line>]` position of a call site.
///
/// # Examples
///
/// ```
/// use multisink_logger::core::formatter::format_position;
///
/// assert_eq!(format_position("src/net/client.rs", 42), "client.rs[42]");
/// assert_eq!(format_position("main.rs", 7), "main.rs[7]");
/// ```
#[must_use]
pub fn format_position(file_path: &str, line: u32) -> String {
    format!("{}[{}]", basename(file_path), line)
}

/// Strip every directory component from `path`, whichever separator it uses
pub fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Render a timestamp with millisecond precision in its own time zone.
#[must_use]
pub fn format_timestamp<Tz>(timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp.format(TIMESTAMP_PATTERN).to_string()
}

/// Render the line written by the console and file sinks:
/// `<timestamp> > <TAG> @ <position> : <message>`
#[must_use]
pub fn format_line<Tz>(
    timestamp: &DateTime<Tz>,
    level: LogLevel,
    position: &str,
    message: &str,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "{} > {} @ {} : {}",
        format_timestamp(timestamp),
        level.tag(),
        position,
        message
    )
}

/// Render the form body posted by the remote sink.
///
/// Fields appear in the order `loglevel`, `timestamp`, `message`, `position`,
/// `identifier`, each value form-urlencoded.
#[must_use]
pub fn format_remote_body<Tz>(
    timestamp: &DateTime<Tz>,
    level: LogLevel,
    position: &str,
    message: &str,
    identifier: &str,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    form_urlencoded::Serializer::new(String::new())
        .append_pair("loglevel", level.tag())
        .append_pair("timestamp", &format_timestamp(timestamp))
        .append_pair("message", message)
        .append_pair("position", position)
        .append_pair("identifier", identifier)
        .finish()
}
