//! Logging macros that capture the call site.
//!
//! Each macro records `file!()`, `line!()` and the enclosing function name,
//! then formats its arguments like `format!`.
//!
//! # Examples
//!
//! ```
//! use multisink_logger::prelude::*;
//! use multisink_logger::{access, info, warning};
//!
//! let logger = Logger::builder()
//!     .data_dir(std::env::temp_dir())
//!     .console(ConsoleSink::with_writer(SharedBuffer::new()))
//!     .build();
//!
//! fn open_session(logger: &Logger, user: &str) {
//!     access!(logger);
//!     info!(logger, "session opened for {}", user);
//! }
//!
//! open_session(&logger, "ada");
//! warning!(logger, "{} sessions still open", 3);
//! ```

/// Name of the enclosing function, without its module path.
///
/// Closures report the function they are defined in.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        let name = name.strip_suffix("::f").unwrap_or(name);
        let name = name.trim_end_matches("::{{closure}}");
        name.rsplit("::").next().unwrap_or(name)
    }};
}

/// The [`CallSite`](crate::core::CallSite) of the macro invocation.
///
/// ```
/// use multisink_logger::call_site;
///
/// fn handler() -> multisink_logger::CallSite {
///     call_site!()
/// }
///
/// let site = handler();
/// assert_eq!(site.function, Some("handler"));
/// assert!(site.position().ends_with(']'));
/// ```
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::core::CallSite::new(file!(), line!()).with_function($crate::function_name!())
    };
}

/// Log a message at an explicit level with automatic formatting.
///
/// ```
/// # use multisink_logger::prelude::*;
/// # let logger = Logger::builder().data_dir(std::env::temp_dir()).console(ConsoleSink::with_writer(SharedBuffer::new())).build();
/// use multisink_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, $crate::call_site!(), format!($($arg)+))
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// ```
/// # use multisink_logger::prelude::*;
/// # let logger = Logger::builder().data_dir(std::env::temp_dir()).console(ConsoleSink::with_writer(SharedBuffer::new())).build();
/// use multisink_logger::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Log an error-level message.
///
/// ```
/// # use multisink_logger::prelude::*;
/// # let logger = Logger::builder().data_dir(std::env::temp_dir()).console(ConsoleSink::with_writer(SharedBuffer::new())).build();
/// use multisink_logger::error;
/// error!(logger, "Connection failed");
/// error!(logger, "Failed to open file: {}", "config.toml");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log an error value at Error level.
#[macro_export]
macro_rules! error_object {
    ($logger:expr, $err:expr) => {
        $logger.error_object($crate::call_site!(), $err)
    };
}

/// Record entry into the enclosing function at Trace level.
#[macro_export]
macro_rules! access {
    ($logger:expr) => {
        $logger.access($crate::call_site!())
    };
}

/// Record a memory warning for the current file at Warning level.
#[macro_export]
macro_rules! memory {
    ($logger:expr) => {
        $logger.memory($crate::call_site!())
    };
}
