//! Shared, live configuration of the three sinks
//!
//! [`SessionConfig`] is a plain value. [`SharedConfig`] holds the current
//! value behind a lock and hands out whole snapshots, so a dispatch never sees
//! one sink's flag from one configuration and its level set from another.

use super::log_level::{LevelSet, LogLevel};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub const DEFAULT_LOCAL_FILENAME: &str = "application.log";

/// Names one of the three sinks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    Console,
    Local,
    Remote,
}

impl SinkKind {
    pub const ALL: [SinkKind; 3] = [SinkKind::Console, SinkKind::Local, SinkKind::Remote];

    pub fn as_str(&self) -> &'static str {
        match self {
            SinkKind::Console => "console",
            SinkKind::Local => "local",
            SinkKind::Remote => "remote",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration of all sinks.
///
/// `Default` gives the documented start-up values. The remote sink starts
/// disabled so no network traffic happens until it is configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub console_enabled: bool,
    pub console_levels: LevelSet,
    pub local_enabled: bool,
    pub local_levels: LevelSet,
    pub local_filename: String,
    pub remote_enabled: bool,
    pub remote_levels: LevelSet,
    pub remote_url: String,
    pub remote_identifier: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            console_enabled: true,
            console_levels: LevelSet::all(),
            local_enabled: true,
            local_levels: LevelSet::of(&[LogLevel::Info, LogLevel::Warning, LogLevel::Error]),
            local_filename: DEFAULT_LOCAL_FILENAME.to_string(),
            remote_enabled: false,
            remote_levels: LevelSet::of(&[LogLevel::Warning, LogLevel::Error]),
            remote_url: String::new(),
            remote_identifier: String::new(),
        }
    }
}

impl SessionConfig {
    pub fn is_enabled(&self, sink: SinkKind) -> bool {
        match sink {
            SinkKind::Console => self.console_enabled,
            SinkKind::Local => self.local_enabled,
            SinkKind::Remote => self.remote_enabled,
        }
    }

    pub fn levels(&self, sink: SinkKind) -> LevelSet {
        match sink {
            SinkKind::Console => self.console_levels,
            SinkKind::Local => self.local_levels,
            SinkKind::Remote => self.remote_levels,
        }
    }

    pub fn set_enabled(&mut self, sink: SinkKind, enabled: bool) {
        match sink {
            SinkKind::Console => self.console_enabled = enabled,
            SinkKind::Local => self.local_enabled = enabled,
            SinkKind::Remote => self.remote_enabled = enabled,
        }
    }

    /// Whether `sink` has somewhere to deliver to
    pub fn has_endpoint(&self, sink: SinkKind) -> bool {
        match sink {
            SinkKind::Console => true,
            SinkKind::Local => !self.local_filename.is_empty(),
            SinkKind::Remote => url::Url::parse(&self.remote_url).is_ok(),
        }
    }

    /// The per-sink gate: enabled, level in the set, usable endpoint
    pub fn accepts(&self, sink: SinkKind, level: LogLevel) -> bool {
        self.is_enabled(sink) && self.levels(sink).contains(level) && self.has_endpoint(sink)
    }

    /// Apply every field present in `update`, keeping the rest
    pub fn apply(&mut self, update: &ConfigUpdate) {
        if let Some(enabled) = update.console_enabled {
            self.console_enabled = enabled;
        }
        if let Some(levels) = update.console_levels {
            self.console_levels = levels;
        }
        if let Some(enabled) = update.local_enabled {
            self.local_enabled = enabled;
        }
        if let Some(levels) = update.local_levels {
            self.local_levels = levels;
        }
        if let Some(ref filename) = update.local_filename {
            self.local_filename = filename.clone();
        }
        if let Some(enabled) = update.remote_enabled {
            self.remote_enabled = enabled;
        }
        if let Some(levels) = update.remote_levels {
            self.remote_levels = levels;
        }
        if let Some(ref url) = update.remote_url {
            self.remote_url = url.clone();
        }
        if let Some(ref identifier) = update.remote_identifier {
            self.remote_identifier = identifier.clone();
        }
    }
}

/// A partial reconfiguration. Absent options keep their current value.
///
/// # Example
///
/// ```
/// use multisink_logger::core::{ConfigUpdate, LevelSet, LogLevel, SessionConfig};
///
/// let update = ConfigUpdate::new()
///     .console_levels(LevelSet::of(&[LogLevel::Error]))
///     .local_filename("worker.log");
///
/// let mut config = SessionConfig::default();
/// config.apply(&update);
/// assert_eq!(config.local_filename, "worker.log");
/// assert!(config.local_enabled);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigUpdate {
    pub console_enabled: Option<bool>,
    pub console_levels: Option<LevelSet>,
    pub local_enabled: Option<bool>,
    pub local_levels: Option<LevelSet>,
    pub local_filename: Option<String>,
    pub remote_enabled: Option<bool>,
    pub remote_levels: Option<LevelSet>,
    pub remote_url: Option<String>,
    pub remote_identifier: Option<String>,
}

impl ConfigUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn console_enabled(mut self, enabled: bool) -> Self {
        self.console_enabled = Some(enabled);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn console_levels(mut self, levels: LevelSet) -> Self {
        self.console_levels = Some(levels);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn local_enabled(mut self, enabled: bool) -> Self {
        self.local_enabled = Some(enabled);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn local_levels(mut self, levels: LevelSet) -> Self {
        self.local_levels = Some(levels);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn local_filename(mut self, filename: impl Into<String>) -> Self {
        self.local_filename = Some(filename.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn remote_enabled(mut self, enabled: bool) -> Self {
        self.remote_enabled = Some(enabled);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn remote_levels(mut self, levels: LevelSet) -> Self {
        self.remote_levels = Some(levels);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn remote_url(mut self, url: impl Into<String>) -> Self {
        self.remote_url = Some(url.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn remote_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.remote_identifier = Some(identifier.into());
        self
    }
}

/// The live configuration consulted on every dispatch
#[derive(Debug, Default)]
pub struct SharedConfig {
    current: RwLock<Arc<SessionConfig>>,
}

impl SharedConfig {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            current: RwLock::new(Arc::new(config)),
        }
    }

    /// One consistent view of the whole configuration
    #[inline]
    pub fn snapshot(&self) -> Arc<SessionConfig> {
        Arc::clone(&self.current.read())
    }

    /// Apply a partial update as a single step
    pub fn configure(&self, update: &ConfigUpdate) {
        let mut current = self.current.write();
        let mut next = SessionConfig::clone(&current);
        next.apply(update);
        *current = Arc::new(next);
    }

    /// Overwrite the whole configuration
    pub fn replace(&self, config: SessionConfig) {
        *self.current.write() = Arc::new(config);
    }

    /// Switch one sink off. Returns whether it was enabled before.
    pub fn disable(&self, sink: SinkKind) -> bool {
        let mut current = self.current.write();
        if !current.is_enabled(sink) {
            return false;
        }
        let mut next = SessionConfig::clone(&current);
        next.set_enabled(sink, false);
        *current = Arc::new(next);
        true
    }

    pub fn is_enabled(&self, sink: SinkKind) -> bool {
        self.current.read().is_enabled(sink)
    }
}
