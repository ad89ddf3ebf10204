//! # Multisink Logger
//!
//! A small logging library that fans each event out to three independently
//! configured sinks: the console, an append-only local file and a remote
//! HTTP endpoint.
//!
//! ## Features
//!
//! - **Set-based filtering**: each sink delivers exactly the levels in its set
//! - **Non-blocking**: one worker thread and bounded queue per sink
//! - **Self-healing**: a sink that fails is switched off and the failure is
//!   logged through the sinks still running
//! - **Live configuration**: partial reconfiguration, applied atomically

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        CallSite, ConfigUpdate, LevelSet, LogEvent, LogLevel, Logger, LoggerBuilder,
        LoggerError, LoggerMetrics, Result, SessionConfig, Sink, SinkKind,
        DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::sinks::{ConsoleSink, HttpTransport, SharedBuffer};
}

pub use crate::core::{
    global, init_global, CallSite, ConfigUpdate, LevelSet, LogEvent, LogLevel, Logger,
    LoggerBuilder, LoggerError, LoggerMetrics, Result, SessionConfig, Sink, SinkKind,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use sinks::{ConsoleSink, FileSink, HttpTransport, RemoteSink, SharedBuffer, UreqTransport};
