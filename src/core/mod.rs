//! Core logger types and traits

pub mod error;
pub mod formatter;
pub mod log_event;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod session_config;
pub mod sink;
mod worker;

pub use error::{error_code, LoggerError, Result};
pub use log_event::{CallSite, LogEvent};
pub use log_level::{LevelSet, LogLevel};
pub use logger::{
    global, init_global, Logger, LoggerBuilder, DEFAULT_QUEUE_CAPACITY, DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use metrics::{LoggerMetrics, SinkCounters};
pub use session_config::{ConfigUpdate, SessionConfig, SharedConfig, SinkKind};
pub use sink::Sink;
