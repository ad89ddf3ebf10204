//! Log level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a log event.
///
/// Levels are never compared by rank; a sink takes an event only when the
/// event's level is a member of that sink's [`LevelSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[serde(alias = "TRC")]
    Trace,
    #[serde(alias = "DBG")]
    Debug,
    #[serde(alias = "INF")]
    Info,
    #[serde(alias = "WRN", alias = "warn")]
    Warning,
    #[serde(alias = "ERR")]
    Error,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
    ];

    /// Three-letter tag written into every rendered line
    pub fn tag(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRC",
            LogLevel::Debug => "DBG",
            LogLevel::Info => "INF",
            LogLevel::Warning => "WRN",
            LogLevel::Error => "ERR",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        }
    }

    #[cfg(feature = "colors")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Trace => BrightBlack,
            LogLevel::Debug => Blue,
            LogLevel::Info => Green,
            LogLevel::Warning => Yellow,
            LogLevel::Error => Red,
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TRC" | "TRACE" => Ok(LogLevel::Trace),
            "DBG" | "DEBUG" => Ok(LogLevel::Debug),
            "INF" | "INFO" => Ok(LogLevel::Info),
            "WRN" | "WARN" | "WARNING" => Ok(LogLevel::Warning),
            "ERR" | "ERROR" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

/// The set of levels a sink delivers.
///
/// Stored as a bitmask so a whole set is copied in one read.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<LogLevel>", into = "Vec<LogLevel>")]
pub struct LevelSet(u8);

impl LevelSet {
    pub const fn empty() -> Self {
        LevelSet(0)
    }

    pub const fn all() -> Self {
        LevelSet(0b1_1111)
    }

    pub fn of(levels: &[LogLevel]) -> Self {
        levels.iter().copied().collect()
    }

    #[inline]
    pub fn contains(&self, level: LogLevel) -> bool {
        self.0 & level.bit() != 0
    }

    pub fn insert(&mut self, level: LogLevel) {
        self.0 |= level.bit();
    }

    pub fn remove(&mut self, level: LogLevel) {
        self.0 &= !level.bit();
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = LogLevel> + '_ {
        LogLevel::ALL.into_iter().filter(|level| self.contains(*level))
    }
}

impl FromIterator<LogLevel> for LevelSet {
    fn from_iter<I: IntoIterator<Item = LogLevel>>(iter: I) -> Self {
        let mut set = LevelSet::empty();
        for level in iter {
            set.insert(level);
        }
        set
    }
}

impl From<Vec<LogLevel>> for LevelSet {
    fn from(levels: Vec<LogLevel>) -> Self {
        levels.into_iter().collect()
    }
}

impl From<LevelSet> for Vec<LogLevel> {
    fn from(set: LevelSet) -> Self {
        set.iter().collect()
    }
}

impl fmt::Debug for LevelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
