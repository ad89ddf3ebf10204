//! One worker thread per sink
//!
//! The logging thread only gates and enqueues. Each sink drains its own
//! bounded queue on a dedicated thread, so events reach a given sink in the
//! order they were logged, and a slow or failing sink never holds up the
//! caller or the other sinks.

use super::{
    error::LoggerError,
    log_event::LogEvent,
    logger::Dispatcher,
    metrics::LoggerMetrics,
    session_config::{SessionConfig, SharedConfig, SinkKind},
    sink::Sink,
};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::RwLock;
use std::sync::{Arc, Weak};
use std::thread;
use std::time::Instant;

pub(crate) enum Command {
    Deliver {
        event: Arc<LogEvent>,
        config: Arc<SessionConfig>,
    },
    /// Acknowledged once everything queued before it has been handled
    Flush(Sender<()>),
}

/// The logging side of a sink: its gate and its queue
pub(crate) struct SinkQueue {
    kind: SinkKind,
    sender: RwLock<Option<Sender<Command>>>,
}

impl SinkQueue {
    /// Create a queue and the receiver its worker will drain
    pub(crate) fn channel(kind: SinkKind, capacity: usize) -> (Self, Receiver<Command>) {
        let (sender, receiver) = bounded(capacity.max(1));
        (
            Self {
                kind,
                sender: RwLock::new(Some(sender)),
            },
            receiver,
        )
    }

    /// A queue without a worker; every event is filtered out
    pub(crate) fn inert(kind: SinkKind) -> Self {
        Self {
            kind,
            sender: RwLock::new(None),
        }
    }

    /// Gate `event` against `config` and enqueue it without blocking
    pub(crate) fn offer(
        &self,
        event: &Arc<LogEvent>,
        config: &Arc<SessionConfig>,
        metrics: &LoggerMetrics,
    ) {
        let counters = metrics.sink(self.kind);
        let guard = self.sender.read();
        let sender = match guard.as_ref() {
            Some(sender) if config.accepts(self.kind, event.level) => sender,
            _ => {
                counters.record_filtered();
                return;
            }
        };

        let command = Command::Deliver {
            event: Arc::clone(event),
            config: Arc::clone(config),
        };
        match sender.try_send(command) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                let dropped = counters.record_dropped();
                // Alert on first drop and periodically thereafter
                if dropped == 0 || (dropped + 1) % 1000 == 0 {
                    eprintln!(
                        "[LOGGER WARNING] {} sink queue full, {} events dropped",
                        self.kind,
                        dropped + 1
                    );
                }
            }
            Err(TrySendError::Disconnected(_)) => {
                counters.record_dropped();
            }
        }
    }

    /// Wait until the worker has handled everything queued so far.
    ///
    /// Returns `false` if `deadline` passes first. A queue without a worker
    /// is trivially flushed.
    pub(crate) fn barrier(&self, deadline: Instant) -> bool {
        let (ack_tx, ack_rx) = bounded(1);
        {
            let guard = self.sender.read();
            let Some(sender) = guard.as_ref() else {
                return true;
            };
            let timeout = deadline.saturating_duration_since(Instant::now());
            if sender.send_timeout(Command::Flush(ack_tx), timeout).is_err() {
                return false;
            }
        }
        let timeout = deadline.saturating_duration_since(Instant::now());
        ack_rx.recv_timeout(timeout).is_ok()
    }

    /// Drop the sender so the worker drains its queue and exits
    pub(crate) fn close(&self) {
        self.sender.write().take();
    }
}

/// The delivering side of a sink
pub(crate) struct SinkWorker {
    sink: Box<dyn Sink>,
    receiver: Receiver<Command>,
    config: Arc<SharedConfig>,
    metrics: Arc<LoggerMetrics>,
    dispatcher: Weak<Dispatcher>,
}

impl SinkWorker {
    pub(crate) fn new(
        sink: Box<dyn Sink>,
        receiver: Receiver<Command>,
        config: Arc<SharedConfig>,
        metrics: Arc<LoggerMetrics>,
        dispatcher: Weak<Dispatcher>,
    ) -> Self {
        Self {
            sink,
            receiver,
            config,
            metrics,
            dispatcher,
        }
    }

    pub(crate) fn spawn(self) -> std::io::Result<thread::JoinHandle<()>> {
        thread::Builder::new()
            .name(format!("logger-{}", self.sink.kind()))
            .spawn(move || self.run())
    }

    fn run(mut self) {
        while let Ok(command) = self.receiver.recv() {
            match command {
                Command::Deliver { event, config } => self.deliver(&event, &config),
                Command::Flush(ack) => {
                    let _ = ack.send(());
                }
            }
        }
    }

    fn deliver(&mut self, event: &LogEvent, config: &SessionConfig) {
        let kind = self.sink.kind();
        let counters = self.metrics.sink(kind);

        // Disabled after this event was queued
        if !self.config.is_enabled(kind) {
            counters.record_skipped();
            return;
        }

        let sink = &mut self.sink;
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            sink.deliver(event, config)
        }));

        match result {
            Ok(Ok(())) => {
                counters.record_delivered();
            }
            Ok(Err(e)) => {
                self.disable_and_report(e);
                // Counted once the report is queued, so a flush that sees the
                // count change knows to wait for the report as well
                counters.record_failed();
            }
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                eprintln!(
                    "[LOGGER CRITICAL] {} sink panicked: {}. Disabling it; other sinks continue to function.",
                    kind, panic_msg
                );
                self.disable_and_report(LoggerError::other(format!(
                    "{} sink panicked: {}",
                    kind, panic_msg
                )));
                counters.record_failed();
            }
        }
    }

    /// Switch the sink off, then log why.
    ///
    /// The flag is cleared before the report is dispatched, so the report is
    /// gated out of this very sink.
    fn disable_and_report(&self, error: LoggerError) {
        if !self.config.disable(self.sink.kind()) {
            return;
        }
        let Some(dispatcher) = self.dispatcher.upgrade() else {
            eprintln!(
                "[LOGGER ERROR] {} sink disabled after failure: {}",
                self.sink.kind(),
                error
            );
            return;
        };

        let site = crate::call_site!();
        dispatcher.error(&site, self.sink.failure_notice(&error));
        if self.sink.reports_error_object(&error) {
            dispatcher.error_object(&site, &error);
        }
    }
}
