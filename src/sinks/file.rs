//! Local file sink implementation

use crate::core::{LogEvent, LoggerError, Result, SessionConfig, Sink, SinkKind};
use parking_lot::Mutex;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// The local log file's directory, plus the lock serializing every access to
/// the file from this process.
#[derive(Debug)]
pub struct LocalLogStore {
    dir: Option<PathBuf>,
    lock: Mutex<()>,
}

impl LocalLogStore {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self {
            dir,
            lock: Mutex::new(()),
        }
    }

    /// Whether there is a directory to write into
    pub fn is_available(&self) -> bool {
        self.dir.is_some()
    }

    /// `<dir>/<filename>`, or `None` without a directory or file name
    pub fn path_for(&self, filename: &str) -> Option<PathBuf> {
        if filename.is_empty() {
            return None;
        }
        self.dir.as_ref().map(|dir| dir.join(filename))
    }

    /// Append one complete line.
    ///
    /// The data directory and the file are created when missing; otherwise
    /// the file is opened, positioned at its end and written with a single
    /// call.
    pub fn append(&self, filename: &str, line: &str) -> Result<()> {
        let path = self
            .path_for(filename)
            .ok_or_else(|| LoggerError::other("No local log file configured"))?;
        let describe = || path.display().to_string();

        let _guard = self.lock.lock();
        if let Some(dir) = self.dir.as_deref().filter(|dir| !dir.exists()) {
            fs::create_dir_all(dir).map_err(|e| {
                LoggerError::io_operation("creating log directory", dir.display().to_string(), e)
            })?;
        }
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .open(&path)
            .map_err(|e| LoggerError::io_operation("opening log file", describe(), e))?;

        #[cfg(feature = "file-lock")]
        fs2::FileExt::lock_exclusive(&file)
            .map_err(|e| LoggerError::io_operation("locking log file", describe(), e))?;

        let result = file
            .seek(SeekFrom::End(0))
            .and_then(|_| file.write_all(line.as_bytes()))
            .map_err(|e| LoggerError::io_operation("appending to log file", describe(), e));

        #[cfg(feature = "file-lock")]
        let _ = fs2::FileExt::unlock(&file);

        result
    }

    /// Read the whole file and delete it.
    ///
    /// `Ok(None)` when there is nothing to take.
    pub fn take(&self, filename: &str) -> Result<Option<String>> {
        let Some(path) = self.path_for(filename) else {
            return Ok(None);
        };

        let _guard = self.lock.lock();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(LoggerError::io_operation(
                    "reading log file",
                    path.display().to_string(),
                    e,
                ))
            }
        };
        fs::remove_file(&path).map_err(|e| {
            LoggerError::io_operation("deleting log file", path.display().to_string(), e)
        })?;
        Ok(Some(content))
    }

    /// Delete the file; a missing file is not an error
    pub fn remove(&self, filename: &str) -> Result<()> {
        let Some(path) = self.path_for(filename) else {
            return Ok(());
        };

        let _guard = self.lock.lock();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LoggerError::io_operation(
                "deleting log file",
                path.display().to_string(),
                e,
            )),
        }
    }
}

/// Appends each event as one line to the configured local log file
pub struct FileSink {
    store: Arc<LocalLogStore>,
}

impl FileSink {
    pub fn new(store: Arc<LocalLogStore>) -> Self {
        Self { store }
    }
}

impl Sink for FileSink {
    fn kind(&self) -> SinkKind {
        SinkKind::Local
    }

    fn deliver(&mut self, event: &LogEvent, config: &SessionConfig) -> Result<()> {
        let mut line = event.render_line();
        line.push('\n');
        self.store.append(&config.local_filename, &line)
    }

    fn failure_notice(&self, _error: &LoggerError) -> String {
        "Unable to log to local file - disabling local-logging".to_string()
    }
}
