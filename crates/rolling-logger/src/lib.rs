//! Rolling Logger
//!
//! File logger with size-based rotation and a circular buffer of the most
//! recent lines. `init_logger` installs a `tracing` subscriber that also
//! receives records emitted through the `log` facade.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tracing_subscriber::fmt::MakeWriter;

/// Rotate once the active file would grow past this many bytes
pub const DEFAULT_MAX_BYTES: u64 = 1024 * 1024;

/// Lines kept in memory for `recent_lines`
pub const DEFAULT_BUFFER_LINES: usize = 500;

static GLOBAL: OnceLock<RollingLogger> = OnceLock::new();

/// Shared handle to a rolling log file
#[derive(Clone)]
pub struct RollingLogger {
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    path: PathBuf,
    file: Option<File>,
    written: u64,
    max_bytes: u64,
    recent: VecDeque<String>,
    capacity: usize,
    // Bytes of a line not yet terminated by '\n'
    pending: String,
}

impl RollingLogger {
    /// Open (or append to) `<log_dir>/<app_name>.log`
    pub fn open(log_dir: &Path, app_name: &str, max_bytes: u64, capacity: usize) -> io::Result<Self> {
        fs::create_dir_all(log_dir)?;
        let path = log_dir.join(format!("{}.log", app_name));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();

        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                path,
                file: Some(file),
                written,
                max_bytes,
                recent: VecDeque::with_capacity(capacity),
                capacity,
                pending: String::new(),
            })),
        })
    }

    /// Path of the active log file
    pub fn path(&self) -> PathBuf {
        match self.inner.lock() {
            Ok(inner) => inner.path.clone(),
            Err(poisoned) => poisoned.into_inner().path.clone(),
        }
    }

    /// Most recent complete lines, oldest first
    pub fn recent_lines(&self) -> Vec<String> {
        match self.inner.lock() {
            Ok(inner) => inner.recent.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    fn write_bytes(&self, buf: &[u8]) -> io::Result<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("logger mutex poisoned"))?;
        inner.write_bytes(buf)
    }

    fn flush(&self) -> io::Result<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("logger mutex poisoned"))?;
        match inner.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl Inner {
    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<()> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }

        if let Some(file) = self.file.as_mut() {
            file.write_all(buf)?;
        }
        self.written += buf.len() as u64;
        self.remember(buf);
        Ok(())
    }

    /// Move the active file to `<app>.log.1` and start a fresh one
    fn rotate(&mut self) -> io::Result<()> {
        // Close before renaming, Windows refuses to rename open files
        self.file = None;

        let backup = self.path.with_extension("log.1");
        if backup.exists() {
            fs::remove_file(&backup)?;
        }
        fs::rename(&self.path, &backup)?;

        self.file = Some(OpenOptions::new().create(true).append(true).open(&self.path)?);
        self.written = 0;
        Ok(())
    }

    fn remember(&mut self, buf: &[u8]) {
        if self.capacity == 0 {
            return;
        }
        self.pending.push_str(&String::from_utf8_lossy(buf));

        while let Some(pos) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=pos).collect();
            if self.recent.len() == self.capacity {
                self.recent.pop_front();
            }
            self.recent.push_back(line.trim_end().to_string());
        }
    }
}

/// Writer handed out to the fmt subscriber for each event
pub struct LogWriter {
    logger: RollingLogger,
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.logger.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.logger.flush()
    }
}

impl<'a> MakeWriter<'a> for RollingLogger {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter { logger: self.clone() }
    }
}

/// Initialize the global logger with default rotation settings
pub fn init_logger(log_dir: PathBuf, app_name: &str) -> Result<(), String> {
    init_logger_with(log_dir, app_name, DEFAULT_MAX_BYTES, DEFAULT_BUFFER_LINES)
}

/// Initialize the global logger.
///
/// Fails if a global subscriber is already installed.
pub fn init_logger_with(
    log_dir: PathBuf,
    app_name: &str,
    max_bytes: u64,
    buffer_lines: usize,
) -> Result<(), String> {
    let logger = RollingLogger::open(&log_dir, app_name, max_bytes, buffer_lines)
        .map_err(|e| format!("Failed to open log file in {}: {}", log_dir.display(), e))?;

    tracing_subscriber::fmt()
        .with_writer(logger.clone())
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| format!("Failed to install log subscriber: {}", e))?;

    let _ = GLOBAL.set(logger);

    log::info!(
        "=== {} started at {} ===",
        app_name,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f")
    );
    Ok(())
}

/// Log an info line through the global logger
pub fn info(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    log::info!("{}", msg);
    Ok(())
}

/// Log an error line through the global logger
pub fn error(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    log::error!("{}", msg);
    Ok(())
}

/// Recent lines from the global logger (empty before init)
pub fn recent_lines() -> Vec<String> {
    GLOBAL.get().map(|l| l.recent_lines()).unwrap_or_default()
}

fn ensure_initialized() -> Result<(), String> {
    installed(GLOBAL.get()).map(|_| ())
}

fn installed(logger: Option<&RollingLogger>) -> Result<&RollingLogger, String> {
    logger.ok_or_else(|| "Logger not initialized".to_string())
}
