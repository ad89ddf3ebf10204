//! Main logger implementation

use super::{
    error::{error_code, LoggerError, Result},
    log_event::{CallSite, LogEvent},
    log_level::LogLevel,
    metrics::LoggerMetrics,
    session_config::{ConfigUpdate, SessionConfig, SharedConfig, SinkKind},
    sink::Sink,
    worker::{SinkQueue, SinkWorker},
};
use crate::sinks::{ConsoleSink, FileSink, HttpTransport, LocalLogStore, RemoteSink, UreqTransport};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

/// Default shutdown timeout for logger cleanup (5 seconds)
///
/// This timeout is used when the logger is dropped without explicit shutdown.
/// For custom timeout control, use the `shutdown()` method instead.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Default capacity of each sink's queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// Shared core: configuration, metrics and the three sink queues.
///
/// Sink workers hold a `Weak` to this so they can report their own failures
/// through the same gates as any other event.
pub(crate) struct Dispatcher {
    config: Arc<SharedConfig>,
    metrics: Arc<LoggerMetrics>,
    queues: [SinkQueue; 3],
}

impl Dispatcher {
    /// Offer one event to every sink against a single config snapshot
    pub(crate) fn dispatch(&self, event: LogEvent) {
        let snapshot = self.config.snapshot();
        let event = Arc::new(event);
        for queue in &self.queues {
            queue.offer(&event, &snapshot, &self.metrics);
        }
    }

    pub(crate) fn log(&self, level: LogLevel, site: &CallSite, message: impl Into<String>) {
        self.dispatch(LogEvent::new(level, site, message));
    }

    pub(crate) fn error(&self, site: &CallSite, message: impl Into<String>) {
        self.log(LogLevel::Error, site, message);
    }

    pub(crate) fn error_object(&self, site: &CallSite, error: &(dyn std::error::Error + 'static)) {
        let message = format!("Error# {} occured \"{}\"", error_code(error), error);
        self.log(LogLevel::Error, site, message);
    }

    fn queue(&self, kind: SinkKind) -> &SinkQueue {
        &self.queues[kind.index()]
    }

    fn close(&self) {
        for queue in &self.queues {
            queue.close();
        }
    }
}

/// Fans events out to the console, local file and remote sinks.
///
/// Every entry point returns immediately; delivery happens on one worker
/// thread per sink. Logging never fails from the caller's point of view.
///
/// # Example
///
/// ```no_run
/// use multisink_logger::prelude::*;
/// use multisink_logger::{call_site, info};
///
/// let logger = Logger::builder()
///     .data_dir("/tmp/my-app")
///     .config(SessionConfig {
///         remote_enabled: true,
///         remote_url: "https://logs.example.com/ingest".to_string(),
///         remote_identifier: "session-42".to_string(),
///         ..SessionConfig::default()
///     })
///     .build();
///
/// logger.warning(call_site!(), "disk at 91%");
/// info!(logger, "processed {} jobs", 12);
/// ```
pub struct Logger {
    dispatcher: Arc<Dispatcher>,
    store: Arc<LocalLogStore>,
    workers: Vec<(SinkKind, thread::JoinHandle<()>)>,
}

impl Logger {
    /// A logger with default configuration, writing to the platform data directory
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    // Entry points

    /// Log at `level` with an already rendered message
    #[inline]
    pub fn log(&self, level: LogLevel, site: CallSite, message: impl Into<String>) {
        self.dispatcher.log(level, &site, message);
    }

    /// Record that the function at `site` was entered, at Trace
    pub fn access(&self, site: CallSite) {
        let message = format!(
            "Accessed function \"{}\"",
            site.function.unwrap_or("<unknown>")
        );
        self.log(LogLevel::Trace, site, message);
    }

    /// Record a memory warning received by the file at `site`, at Warning
    pub fn memory(&self, site: CallSite) {
        let message = format!("\"{}\" received a memory-warning", site.basename());
        self.log(LogLevel::Warning, site, message);
    }

    #[inline]
    pub fn trace(&self, site: CallSite, message: impl Into<String>) {
        self.log(LogLevel::Trace, site, message);
    }

    #[inline]
    pub fn debug(&self, site: CallSite, message: impl Into<String>) {
        self.log(LogLevel::Debug, site, message);
    }

    #[inline]
    pub fn info(&self, site: CallSite, message: impl Into<String>) {
        self.log(LogLevel::Info, site, message);
    }

    #[inline]
    pub fn warning(&self, site: CallSite, message: impl Into<String>) {
        self.log(LogLevel::Warning, site, message);
    }

    #[inline]
    pub fn error(&self, site: CallSite, message: impl Into<String>) {
        self.log(LogLevel::Error, site, message);
    }

    /// Log an error value at Error as `Error# <code> occured "<description>"`
    pub fn error_object(&self, site: CallSite, error: &(dyn std::error::Error + 'static)) {
        self.dispatcher.error_object(&site, error);
    }

    // Configuration

    /// Apply a partial reconfiguration; absent options keep their value
    pub fn configure(&self, update: ConfigUpdate) {
        self.dispatcher.config.configure(&update);
    }

    /// Overwrite the whole configuration
    pub fn replace_config(&self, config: SessionConfig) {
        self.dispatcher.config.replace(config);
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> Arc<SessionConfig> {
        self.dispatcher.config.snapshot()
    }

    pub fn is_enabled(&self, sink: SinkKind) -> bool {
        self.dispatcher.config.is_enabled(sink)
    }

    /// Get the logger metrics for detailed observability
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.dispatcher.metrics
    }

    // Local log housekeeping

    /// Full path of the local log file under the current configuration
    pub fn local_log_path(&self) -> Option<PathBuf> {
        self.store.path_for(&self.config().local_filename)
    }

    /// Return the local log's content and delete the file.
    ///
    /// Returns an empty string when there is no data directory, no file
    /// name, no file, or the file could not be read or removed. Events still
    /// queued for the file sink are not waited for; call [`flush`](Self::flush)
    /// first when that matters.
    pub fn flush_local_log(&self) -> String {
        let filename = self.config().local_filename.clone();
        match self.store.take(&filename) {
            Ok(content) => content.unwrap_or_default(),
            Err(e) => {
                let site = crate::call_site!();
                self.dispatcher.error(&site, "Unable to delete file");
                self.dispatcher.error_object(&site, &e);
                String::new()
            }
        }
    }

    /// Delete the local log file if it exists
    pub fn delete_local_log(&self) {
        let filename = self.config().local_filename.clone();
        if let Err(e) = self.store.remove(&filename) {
            let site = crate::call_site!();
            self.dispatcher.error(&site, "Unable to delete file");
            self.dispatcher.error_object(&site, &e);
        }
    }

    // Lifecycle

    /// Wait until every sink has handled the events queued before this call,
    /// including the failure reports those events trigger.
    ///
    /// Returns `false` if `timeout` elapsed first.
    pub fn flush(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            let failures = self.metrics().total_failed();
            for kind in SinkKind::ALL {
                if !self.dispatcher.queue(kind).barrier(deadline) {
                    return false;
                }
            }
            if self.metrics().total_failed() == failures {
                return true;
            }
        }
    }

    /// Gracefully shutdown the logger with a custom timeout
    ///
    /// Closes every sink queue and waits for the workers to drain them.
    /// Events logged afterwards are dropped. When the logger is dropped
    /// without calling `shutdown()`, [`DEFAULT_SHUTDOWN_TIMEOUT`] is used.
    ///
    /// Returns `true` if every worker finished within `timeout`.
    pub fn shutdown(&mut self, timeout: Duration) -> bool {
        self.dispatcher.close();

        let start = Instant::now();
        let mut clean = true;
        for (kind, handle) in self.workers.drain(..) {
            loop {
                if handle.is_finished() {
                    if let Err(e) = handle.join() {
                        eprintln!(
                            "[LOGGER ERROR] {} sink worker panicked during shutdown: {:?}",
                            kind, e
                        );
                        clean = false;
                    }
                    break;
                }

                if start.elapsed() >= timeout {
                    eprintln!(
                        "[LOGGER WARNING] {} sink worker did not finish within {:?}. \
                         Some events may be lost.",
                        kind, timeout
                    );
                    clean = false;
                    break;
                }

                // Small sleep to avoid busy-waiting
                thread::sleep(Duration::from_millis(10));
            }
        }
        clean
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if !self.workers.is_empty() {
            self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
        }
    }
}

/// Install `logger` as the process-wide instance returned by [`global`]
pub fn init_global(logger: Logger) -> Result<()> {
    GLOBAL
        .set(logger)
        .map_err(|_| LoggerError::AlreadyInitialized)
}

/// The process-wide logger, built with defaults if none was installed
pub fn global() -> &'static Logger {
    GLOBAL.get_or_init(Logger::new)
}

/// `<platform data dir>/<executable name>`, so programs never share a log
fn default_data_dir() -> Option<PathBuf> {
    let app = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
    dirs::data_dir().map(|dir| dir.join(app))
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use multisink_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .config(SessionConfig::default())
///     .data_dir(std::env::temp_dir())
///     .console(ConsoleSink::new().with_colors(true))
///     .queue_capacity(256)
///     .build();
/// ```
pub struct LoggerBuilder {
    config: SessionConfig,
    data_dir: Option<PathBuf>,
    console: Option<ConsoleSink>,
    transport: Option<Arc<dyn HttpTransport>>,
    custom: Vec<Box<dyn Sink>>,
    queue_capacity: usize,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            data_dir: default_data_dir(),
            console: None,
            transport: None,
            custom: Vec::new(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }

    /// Set the initial configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Directory the local log file lives in
    #[must_use = "builder methods return a new value"]
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Use a custom console sink (e.g. one writing to a buffer)
    #[must_use = "builder methods return a new value"]
    pub fn console(mut self, console: ConsoleSink) -> Self {
        self.console = Some(console);
        self
    }

    /// Use a custom HTTP transport for the remote sink
    #[must_use = "builder methods return a new value"]
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replace the built-in sink of the same [`SinkKind`]
    #[must_use = "builder methods return a new value"]
    pub fn sink(mut self, sink: Box<dyn Sink>) -> Self {
        self.custom.retain(|existing| existing.kind() != sink.kind());
        self.custom.push(sink);
        self
    }

    /// Capacity of each sink's queue
    #[must_use = "builder methods return a new value"]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Build the logger.
    ///
    /// A sink whose worker thread cannot be started is left inert and the
    /// failure is printed to stderr.
    pub fn build(self) -> Logger {
        self.build_inner(|err| eprintln!("[LOGGER ERROR] {}", err))
            .unwrap_or_else(|(logger, _)| logger)
    }

    /// Build the logger, failing if any sink worker cannot be started
    pub fn try_build(self) -> Result<Logger> {
        self.build_inner(|_| {}).map_err(|(_, err)| err)
    }

    fn build_inner(
        self,
        on_spawn_error: impl Fn(&LoggerError),
    ) -> std::result::Result<Logger, (Logger, LoggerError)> {
        let config = Arc::new(SharedConfig::new(self.config));
        let metrics = Arc::new(LoggerMetrics::new());
        let store = Arc::new(LocalLogStore::new(self.data_dir));
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(UreqTransport::new()));

        let mut sinks: Vec<Box<dyn Sink>> = vec![
            Box::new(self.console.unwrap_or_default()),
            Box::new(RemoteSink::new(transport)),
        ];
        // Without a data directory the file sink has nowhere to write
        if store.is_available() {
            sinks.push(Box::new(FileSink::new(Arc::clone(&store))));
        }
        for custom in self.custom {
            sinks.retain(|builtin| builtin.kind() != custom.kind());
            sinks.push(custom);
        }

        let mut queues = [
            SinkQueue::inert(SinkKind::Console),
            SinkQueue::inert(SinkKind::Local),
            SinkQueue::inert(SinkKind::Remote),
        ];
        let mut receivers = Vec::with_capacity(sinks.len());
        for sink in sinks {
            let (queue, receiver) = SinkQueue::channel(sink.kind(), self.queue_capacity);
            queues[sink.kind().index()] = queue;
            receivers.push((sink, receiver));
        }

        let dispatcher = Arc::new(Dispatcher {
            config: Arc::clone(&config),
            metrics: Arc::clone(&metrics),
            queues,
        });

        let mut workers = Vec::with_capacity(receivers.len());
        let mut first_error = None;
        for (sink, receiver) in receivers {
            let kind = sink.kind();
            let worker = SinkWorker::new(
                sink,
                receiver,
                Arc::clone(&config),
                Arc::clone(&metrics),
                Arc::downgrade(&dispatcher),
            );
            match worker.spawn() {
                Ok(handle) => workers.push((kind, handle)),
                Err(e) => {
                    dispatcher.queue(kind).close();
                    let err = LoggerError::worker_spawn(kind.as_str(), e.to_string());
                    on_spawn_error(&err);
                    first_error.get_or_insert(err);
                }
            }
        }

        let logger = Logger {
            dispatcher,
            store,
            workers,
        };
        match first_error {
            None => Ok(logger),
            Some(err) => Err((logger, err)),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
