//! Basic logger usage example
//!
//! Demonstrates per-sink level sets, the local log file and how a failing
//! sink switches itself off.
//!
//! Run with: cargo run --example basic_usage

use multisink_logger::prelude::*;
use multisink_logger::{access, call_site, error, info, warning};
use std::time::Duration;

fn start_session(logger: &Logger, user: &str) {
    access!(logger);
    info!(logger, "session opened for {}", user);
}

fn main() -> Result<()> {
    println!("=== Multisink Logger - Basic Usage Example ===\n");

    let data_dir = std::env::temp_dir().join("multisink_logger_demo");
    std::fs::create_dir_all(&data_dir)?;

    let logger = Logger::builder()
        .data_dir(&data_dir)
        .console(ConsoleSink::new().with_colors(true))
        .build();

    println!("1. Default sets: console shows everything, the file keeps INF and up:");
    logger.trace(call_site!(), "This is a trace message");
    logger.debug(call_site!(), "This is a debug message");
    start_session(&logger, "ada");
    warning!(logger, "{} sessions still open", 3);
    error!(logger, "This is an error message");
    logger.flush(Duration::from_secs(5));

    println!("\n2. Console narrowed to errors only:");
    logger.configure(ConfigUpdate::new().console_levels(LevelSet::of(&[LogLevel::Error])));
    info!(logger, "Info message (hidden on the console, still in the file)");
    error!(logger, "Error message (visible)");
    logger.flush(Duration::from_secs(5));

    println!("\n3. Local log file contents:");
    print!("{}", logger.flush_local_log());

    println!("\n4. A remote endpoint that cannot be reached disables itself:");
    logger.configure(
        ConfigUpdate::new()
            .console_levels(LevelSet::all())
            .remote_enabled(true)
            .remote_url("http://bad.invalid/ingest")
            .remote_identifier("demo"),
    );
    warning!(logger, "This warning tries the remote endpoint");
    logger.flush(Duration::from_secs(30));
    println!(
        "   remote enabled afterwards: {}",
        logger.is_enabled(SinkKind::Remote)
    );

    logger.delete_local_log();
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
