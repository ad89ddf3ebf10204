//! Stress tests for concurrent logging
//!
//! These tests verify:
//! - Lines written from many threads are never interleaved or lost
//! - Reconfiguring while other threads log is safe
//! - A full queue drops events instead of blocking the caller

use multisink_logger::prelude::*;
use multisink_logger::call_site;
use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

const WAIT: Duration = Duration::from_secs(30);

fn quiet_logger(dir: &TempDir) -> Logger {
    Logger::builder()
        .data_dir(dir.path())
        .console(ConsoleSink::with_writer(std::io::sink()))
        .queue_capacity(100_000)
        .build()
}

/// Every line from every thread reaches the file whole, in per-thread order
#[test]
fn test_concurrent_file_logging_keeps_lines_intact() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Arc::new(quiet_logger(&temp_dir));

    let num_threads = 8;
    let logs_per_thread = 500;
    let barrier = Arc::new(Barrier::new(num_threads));

    let handles: Vec<_> = (0..num_threads)
        .map(|thread_id| {
            let logger = Arc::clone(&logger);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..logs_per_thread {
                    logger.info(call_site!(), format!("thread-{} seq-{}", thread_id, i));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }
    assert!(logger.flush(WAIT));

    let content = fs::read_to_string(temp_dir.path().join("application.log"))
        .expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), num_threads * logs_per_thread);

    let mut next_seq = vec![0usize; num_threads];
    for line in lines {
        let message = line.rsplit(" : ").next().expect("message part");
        let (thread_part, seq_part) = message.split_once(' ').expect("two fields");
        let thread_id: usize = thread_part["thread-".len()..].parse().expect("thread id");
        let seq: usize = seq_part["seq-".len()..].parse().expect("sequence");
        assert_eq!(seq, next_seq[thread_id], "out of order for thread {}", thread_id);
        next_seq[thread_id] += 1;
    }
    assert!(next_seq.iter().all(|&n| n == logs_per_thread));
    assert_eq!(logger.metrics().sink(SinkKind::Local).dropped(), 0);
}

/// Toggling configuration from one thread while others log never tears a
/// snapshot: each event is gated by one consistent configuration
#[test]
fn test_reconfigure_while_logging() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Arc::new(quiet_logger(&temp_dir));
    let running = Arc::new(AtomicBool::new(true));

    let writers: Vec<_> = (0..4)
        .map(|_| {
            let logger = Arc::clone(&logger);
            let running = Arc::clone(&running);
            thread::spawn(move || {
                let mut sent = 0u64;
                while running.load(Ordering::Relaxed) {
                    logger.warning(call_site!(), "tick");
                    sent += 1;
                }
                sent
            })
        })
        .collect();

    let toggler = {
        let logger = Arc::clone(&logger);
        thread::spawn(move || {
            for i in 0..200 {
                let levels = if i % 2 == 0 {
                    LevelSet::of(&[LogLevel::Error])
                } else {
                    LevelSet::all()
                };
                logger.configure(
                    ConfigUpdate::new()
                        .local_levels(levels)
                        .console_enabled(i % 3 != 0),
                );
            }
        })
    };

    toggler.join().expect("Toggler panicked");
    running.store(false, Ordering::Relaxed);
    let sent: u64 = writers
        .into_iter()
        .map(|h| h.join().expect("Writer panicked"))
        .sum();
    assert!(logger.flush(WAIT));

    let local = logger.metrics().sink(SinkKind::Local);
    assert_eq!(local.filtered() + local.delivered() + local.dropped(), sent);
    assert_eq!(local.failed(), 0);

    let content = fs::read_to_string(temp_dir.path().join("application.log")).unwrap_or_default();
    assert_eq!(content.lines().count() as u64, local.delivered());
    assert!(content.lines().all(|line| line.ends_with(" : tick")));
}

/// A sink that never finishes delivering
struct Stalled {
    release: Arc<AtomicBool>,
}

impl Sink for Stalled {
    fn kind(&self) -> SinkKind {
        SinkKind::Console
    }

    fn deliver(&mut self, _event: &LogEvent, _config: &SessionConfig) -> Result<()> {
        while !self.release.load(Ordering::Relaxed) {
            thread::sleep(Duration::from_millis(1));
        }
        Ok(())
    }
}

/// Logging must not wait for a stalled sink; overflow is dropped and counted
#[test]
fn test_full_queue_drops_without_blocking() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let release = Arc::new(AtomicBool::new(false));
    let logger = Logger::builder()
        .data_dir(temp_dir.path())
        .sink(Box::new(Stalled {
            release: Arc::clone(&release),
        }))
        .queue_capacity(8)
        .config(SessionConfig {
            local_enabled: false,
            ..SessionConfig::default()
        })
        .build();

    let start = Instant::now();
    for i in 0..1_000 {
        logger.debug(call_site!(), format!("burst {}", i));
    }
    assert!(
        start.elapsed() < Duration::from_secs(5),
        "logging blocked on a stalled sink"
    );

    let console = logger.metrics().sink(SinkKind::Console);
    assert!(console.dropped() > 0);

    release.store(true, Ordering::Relaxed);
    assert!(logger.flush(WAIT));
    assert_eq!(console.delivered() + console.dropped(), 1_000);
}
