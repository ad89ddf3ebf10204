//! Sink implementations

pub mod console;
pub mod file;
pub mod remote;

pub use console::{ConsoleSink, SharedBuffer, CONSOLE_PREFIX};
pub use file::{FileSink, LocalLogStore};
pub use remote::{HttpTransport, RemoteSink, UreqTransport};

// Re-export the trait for implementors
pub use crate::core::Sink;
