//! Console sink implementation

use crate::core::{LogEvent, Result, SessionConfig, Sink, SinkKind};
#[cfg(feature = "colors")]
use colored::Colorize;
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// Prefix of every console line
pub const CONSOLE_PREFIX: &str = ">> ";

/// Writes `>> <line>` for each event. Write errors are ignored; the console
/// sink never disables itself.
pub struct ConsoleSink {
    writer: Box<dyn Write + Send>,
    #[cfg(feature = "colors")]
    use_colors: bool,
}

impl ConsoleSink {
    /// Console sink on standard output
    pub fn new() -> Self {
        Self::with_writer(std::io::stdout())
    }

    /// Console sink on any writer
    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Box::new(writer),
            #[cfg(feature = "colors")]
            use_colors: false,
        }
    }

    /// Colour the level tag with ANSI escapes (off by default).
    ///
    /// Without the `colors` feature this is a no-op.
    #[must_use]
    pub fn with_colors(self, use_colors: bool) -> Self {
        #[cfg(feature = "colors")]
        return Self { use_colors, ..self };

        #[cfg(not(feature = "colors"))]
        {
            let _ = use_colors;
            self
        }
    }

    fn format_text(&self, event: &LogEvent) -> String {
        #[cfg(feature = "colors")]
        if self.use_colors {
            return format!(
                "{}{} > {} @ {} : {}",
                CONSOLE_PREFIX,
                crate::core::formatter::format_timestamp(&event.timestamp),
                event.level.tag().color(event.level.color_code()),
                event.position,
                event.message
            );
        }

        format!("{}{}", CONSOLE_PREFIX, event.render_line())
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn kind(&self) -> SinkKind {
        SinkKind::Console
    }

    fn deliver(&mut self, event: &LogEvent, _config: &SessionConfig) -> Result<()> {
        let mut output = self.format_text(event);
        output.push('\n');
        let _ = self.writer.write_all(output.as_bytes());
        let _ = self.writer.flush();
        Ok(())
    }
}

/// In-memory writer whose clones share one buffer.
///
/// Handy for capturing console output:
///
/// ```
/// use multisink_logger::sinks::{ConsoleSink, SharedBuffer};
///
/// let buffer = SharedBuffer::new();
/// let sink = ConsoleSink::with_writer(buffer.clone());
/// assert!(buffer.contents().is_empty());
/// # drop(sink);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
