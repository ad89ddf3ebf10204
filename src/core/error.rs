//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}: {source}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The remote endpoint could not be reached
    #[error("Transport error posting to '{url}': {message}")]
    Transport { url: String, message: String },

    /// The remote endpoint answered with something other than 200
    #[error("Remote '{url}' answered with status {status}")]
    HttpStatus { url: String, status: u16 },

    /// The configured remote URL does not parse
    #[error("Invalid remote URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// A sink worker thread could not be started
    #[error("Failed to spawn worker for {sink} sink: {message}")]
    WorkerSpawn { sink: String, message: String },

    /// The process-wide logger was already installed
    #[error("Global logger already initialized")]
    AlreadyInitialized,

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a transport error
    pub fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a non-OK status error
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        LoggerError::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Create an invalid URL error
    pub fn invalid_url(url: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidUrl {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a worker spawn error
    pub fn worker_spawn(sink: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::WorkerSpawn {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// Numeric code reported in `Error# <code>` log lines.
    ///
    /// IO failures carry the OS error number when there is one; HTTP status
    /// failures carry the status. Everything else has a fixed code per variant.
    pub fn code(&self) -> i64 {
        match self {
            LoggerError::IoOperation { source, .. } | LoggerError::IoError(source) => {
                source.raw_os_error().map(i64::from).unwrap_or(1)
            }
            LoggerError::Transport { .. } => 2,
            LoggerError::HttpStatus { status, .. } => i64::from(*status),
            LoggerError::InvalidUrl { .. } => 3,
            LoggerError::WorkerSpawn { .. } => 4,
            LoggerError::AlreadyInitialized => 5,
            LoggerError::Other(_) => 99,
        }
    }
}

/// Find the code to report for an arbitrary error.
///
/// Walks the `source()` chain and returns the first code it recognizes
/// (a [`LoggerError`] or an OS-level `io::Error`), or 0.
pub fn error_code(error: &(dyn std::error::Error + 'static)) -> i64 {
    let mut current = Some(error);
    while let Some(err) = current {
        if let Some(logger_err) = err.downcast_ref::<LoggerError>() {
            return logger_err.code();
        }
        if let Some(code) = err
            .downcast_ref::<std::io::Error>()
            .and_then(std::io::Error::raw_os_error)
        {
            return i64::from(code);
        }
        current = err.source();
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::transport("http://localhost", "connection refused");
        assert!(matches!(err, LoggerError::Transport { .. }));

        let err = LoggerError::http_status("http://localhost", 503);
        assert!(matches!(err, LoggerError::HttpStatus { status: 503, .. }));

        let err = LoggerError::invalid_url("::", "relative URL without a base");
        assert!(matches!(err, LoggerError::InvalidUrl { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::http_status("http://logs.example.com/ingest", 500);
        assert_eq!(
            err.to_string(),
            "Remote 'http://logs.example.com/ingest' answered with status 500"
        );

        let err = LoggerError::worker_spawn("local", "resource temporarily unavailable");
        assert_eq!(
            err.to_string(),
            "Failed to spawn worker for local sink: resource temporarily unavailable"
        );
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("appending to log file", "/data/app.log", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("appending to log file"));
        assert!(err.to_string().contains("/data/app.log"));
    }

    #[test]
    fn test_io_operation_display_includes_os_reason() {
        let os_err = std::io::Error::from_raw_os_error(20);
        let reason = os_err.to_string();
        let err = LoggerError::io_operation("opening log file", "/data/app.log", os_err);

        assert_eq!(
            err.to_string(),
            format!("IO error while opening log file: /data/app.log: {}", reason)
        );
        assert_eq!(err.code(), 20);
    }

    #[test]
    fn test_codes() {
        assert_eq!(LoggerError::http_status("u", 404).code(), 404);
        assert_eq!(LoggerError::transport("u", "down").code(), 2);

        let os_err = std::io::Error::from_raw_os_error(13);
        assert_eq!(LoggerError::from(os_err).code(), 13);
    }

    #[test]
    fn test_error_code_walks_sources() {
        let io_err = std::io::Error::from_raw_os_error(28);
        let wrapped = LoggerError::io_operation("appending to log file", "app.log", io_err);
        assert_eq!(error_code(&wrapped), 28);

        let plain = std::fmt::Error;
        assert_eq!(error_code(&plain), 0);
    }
}
