//! Console and file output for one bound type.
//!
//! Both sinks write lines formatted by [`crate::format::format_line`]. The
//! file sink is best-effort: if the log directory or file cannot be created
//! the manager carries on console-only and records `writable = false`.

use crate::config::{ConsoleStream, DebugLevel, InstrumentationConfig, LOG_FILE_NAME};
use crate::format::format_line;
use crate::level::LogLevel;
use chrono::Local;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Effective sink settings for one bound type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    pub console_level: LogLevel,
    pub file_level: LogLevel,
    pub file_path: PathBuf,
    /// `false` when the file sink was never created
    pub writable: bool,
}

impl SinkConfig {
    /// Levels derived from the debug-level override; WARNING when absent.
    pub fn from_config(config: &InstrumentationConfig) -> Self {
        let level = match config.debug_level {
            Some(DebugLevel::Debug) => LogLevel::Debug,
            Some(DebugLevel::Info) => LogLevel::Info,
            None => LogLevel::Warning,
        };
        Self {
            console_level: level,
            file_level: level,
            file_path: config.log_path(),
            writable: false,
        }
    }
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self::from_config(&InstrumentationConfig::default())
    }
}

/// Where the console sink sends its lines.
#[derive(Debug, Clone)]
pub enum ConsoleTarget {
    Stderr,
    Stdout,
    /// In-memory buffer, for tests and embedding applications
    Capture(CaptureBuffer),
}

impl From<ConsoleStream> for ConsoleTarget {
    fn from(stream: ConsoleStream) -> Self {
        match stream {
            ConsoleStream::Stderr => ConsoleTarget::Stderr,
            ConsoleStream::Stdout => ConsoleTarget::Stdout,
        }
    }
}

impl ConsoleTarget {
    fn writer(&self) -> Box<dyn Write + Send> {
        match self {
            ConsoleTarget::Stderr => Box::new(std::io::stderr()),
            ConsoleTarget::Stdout => Box::new(std::io::stdout()),
            ConsoleTarget::Capture(buffer) => Box::new(buffer.clone()),
        }
    }
}

/// Shared in-memory byte sink. Clones write into the same buffer.
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.bytes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

struct Sink {
    level: LogLevel,
    writer: Box<dyn Write + Send>,
}

impl Sink {
    fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()
    }
}

struct SinkState {
    config: SinkConfig,
    console: Option<Sink>,
    file: Option<Sink>,
    attached: bool,
}

/// Owns the console and optional file sink of one bound type.
pub struct SinkManager {
    logger_name: String,
    state: Mutex<SinkState>,
}

impl SinkManager {
    /// Create a manager with no sinks attached yet.
    pub fn new(logger_name: impl Into<String>) -> Self {
        Self {
            logger_name: logger_name.into(),
            state: Mutex::new(SinkState {
                config: SinkConfig::default(),
                console: None,
                file: None,
                attached: false,
            }),
        }
    }

    pub fn logger_name(&self) -> &str {
        &self.logger_name
    }

    /// Create the console sink and try to create the file sink.
    ///
    /// Only the first call has any effect. Filesystem failures are absorbed.
    pub fn attach(&self, config: &InstrumentationConfig, console: ConsoleTarget) {
        let mut state = self.lock();
        if state.attached {
            tracing::debug!(logger = %self.logger_name, "sinks already attached");
            return;
        }

        let mut sink_config = SinkConfig::from_config(config);

        state.console = Some(Sink {
            level: sink_config.console_level,
            writer: console.writer(),
        });

        match open_log_file(&config.log_dir()) {
            Ok(appender) => {
                sink_config.writable = true;
                state.file = Some(Sink {
                    level: sink_config.file_level,
                    writer: Box::new(appender),
                });
            }
            Err(reason) => {
                tracing::warn!(
                    logger = %self.logger_name,
                    path = %sink_config.file_path.display(),
                    %reason,
                    "log file unavailable, continuing console-only"
                );
            }
        }

        state.config = sink_config;
        state.attached = true;
    }

    pub fn is_attached(&self) -> bool {
        self.lock().attached
    }

    /// Snapshot of the effective sink settings
    pub fn config(&self) -> SinkConfig {
        self.lock().config.clone()
    }

    /// Write `message` to every sink whose threshold admits `level`.
    pub fn emit(&self, level: LogLevel, message: &str) {
        let line = format_line(Local::now(), &self.logger_name, level, message);
        let mut state = self.lock();
        let SinkState { console, file, .. } = &mut *state;

        for (kind, sink) in [("console", console), ("file", file)] {
            let Some(sink) = sink.as_mut() else {
                continue;
            };
            if level < sink.level {
                continue;
            }
            if let Err(e) = sink.write_line(&line) {
                tracing::debug!(
                    logger = %self.logger_name,
                    sink = kind,
                    error = %e,
                    "sink write failed"
                );
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, SinkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn open_log_file(dir: &Path) -> std::result::Result<RollingFileAppender, String> {
    std::fs::create_dir_all(dir).map_err(|e| e.to_string())?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(dir)
        .map_err(|e| e.to_string())
}
