use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::sync::atomic::{AtomicBool, Ordering};

pub const DEFAULT_LOG_FILE: &str = "quiz_debug.log";

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Appends log records to a file; does nothing until a file is attached.
pub struct FileLogger {
    file: Mutex<Option<File>>,
    level: LevelFilter,
}

lazy_static::lazy_static! {
    static ref LOGGER: FileLogger = FileLogger::new(LevelFilter::Debug);
}

impl FileLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self {
            file: Mutex::new(None),
            level,
        }
    }

    pub fn attach(&self, path: &Path) -> std::io::Result<()> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        *self.slot() = Some(file);
        Ok(())
    }

    /// A panic while writing must not silence every later record.
    fn slot(&self) -> MutexGuard<'_, Option<File>> {
        self.file.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Some(file) = self.slot().as_mut() {
            let timestamp = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0);
            let _ = writeln!(
                file,
                "[{}] {} {}: {}",
                timestamp,
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Some(file) = self.slot().as_mut() {
            let _ = file.flush();
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("cannot open log file: {0}")]
    Io(#[from] std::io::Error),
    #[error("another logger is already installed: {0}")]
    AlreadySet(#[from] SetLoggerError),
}

/// Install the process-wide file logger writing to `path`.
///
/// Calling it again only redirects output to the new file.
pub fn init(path: &Path) -> Result<(), LoggerError> {
    LOGGER.attach(path)?;
    match log::set_logger(&*LOGGER) {
        Ok(()) => {
            INSTALLED.store(true, Ordering::SeqCst);
            log::set_max_level(LOGGER.level);
            Ok(())
        }
        Err(_) if INSTALLED.load(Ordering::SeqCst) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// `init` with `quiz_debug.log` in the working directory.
pub fn init_default() -> Result<(), LoggerError> {
    init(Path::new(DEFAULT_LOG_FILE))
}
