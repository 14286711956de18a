//! Logging context for a scraper run.
//!
//! A [`LogManager`] owns one `tracing` dispatcher with a console sink and,
//! when saving is enabled, an info-level and a debug-level log file under
//! the log folder. The caller owns the manager and decides whether the
//! dispatcher is installed globally or only scoped with
//! [`tracing::dispatcher::with_default`].

pub mod timestamp;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use thiserror::Error;
use tracing::dispatcher::SetGlobalDefaultError;
use tracing::{debug, Dispatch, Level};
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, Layer, Registry};

/// Target used for events emitted by the scraper itself.
pub const LOG_TARGET: &str = "board_scraper";

pub const DEFAULT_RETENTION_DAYS: u64 = 3;

const LOG_EXTENSION: &str = "log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum LogError {
    #[error("Logger not set up yet. Call setup() first.")]
    NotConfigured,

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not open log file {file}: {source}")]
    Appender {
        file: String,
        #[source]
        source: InitError,
    },

    #[error(transparent)]
    GlobalDefault(#[from] SetGlobalDefaultError),
}

impl LogError {
    fn io(path: &Path, source: io::Error) -> LogError {
        LogError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Converts a whole number of days into a retention window, saturating on overflow.
pub fn retention_days(days: u64) -> Duration {
    Duration::from_secs(days.saturating_mul(SECONDS_PER_DAY))
}

pub struct LogManager {
    log_folder: PathBuf,
    save_log: bool,
    dispatch: Option<Dispatch>,
    log_files: Vec<PathBuf>,
}

impl LogManager {
    /// Creates the manager, creating `base/subfolder` on disk when `save_log` is set.
    pub fn new(
        base_path: impl AsRef<Path>,
        log_subfolder: impl AsRef<Path>,
        save_log: bool,
    ) -> Result<LogManager, LogError> {
        let log_folder = base_path.as_ref().join(log_subfolder);
        if save_log {
            fs::create_dir_all(&log_folder).map_err(|e| LogError::io(&log_folder, e))?;
        }

        Ok(LogManager {
            log_folder,
            save_log,
            dispatch: None,
            log_files: vec![],
        })
    }

    /// Attaches the console sink at `stream_level` and, when saving, the two log files.
    ///
    /// Calling this again once configured returns the existing dispatcher
    /// without attaching further sinks.
    pub fn setup(&mut self, stream_level: Level) -> Result<&Dispatch, LogError> {
        if self.dispatch.is_some() {
            return self.logger();
        }

        let mut layers: Vec<BoxedLayer> = vec![fmt::layer()
            .with_writer(io::stderr)
            .with_thread_names(true)
            .with_filter(LevelFilter::from_level(stream_level))
            .boxed()];

        if self.save_log {
            let stamp = timestamp::full_time();
            let (info_log, info_path) = self.open_log_file("info_log", &stamp)?;
            let (debug_log, debug_path) = self.open_log_file("debug_log", &stamp)?;
            layers.push(file_layer(info_log, LevelFilter::INFO));
            layers.push(file_layer(debug_log, LevelFilter::DEBUG));
            self.log_files = vec![info_path, debug_path];
        }

        let dispatch = Dispatch::new(Registry::default().with(layers));
        tracing::dispatcher::with_default(&dispatch, || {
            debug!(target: LOG_TARGET, "Logger initialized");
        });

        Ok(&*self.dispatch.insert(dispatch))
    }

    fn open_log_file(
        &self,
        prefix: &str,
        stamp: &str,
    ) -> Result<(RollingFileAppender, PathBuf), LogError> {
        let name = format!("{}_{}", prefix, stamp);
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(name.clone())
            .filename_suffix(LOG_EXTENSION)
            .build(&self.log_folder)
            .map_err(|source| LogError::Appender {
                file: name.clone(),
                source,
            })?;
        let path = self.log_folder.join(format!("{}.{}", name, LOG_EXTENSION));
        Ok((appender, path))
    }

    /// Removes `*.log` files in the log folder older than now minus `retention`.
    ///
    /// A file's age comes from the stamp at the end of its name; names
    /// without one fall back to the modification time. Returns the removed
    /// paths. A log folder that does not exist yields nothing.
    pub fn cleanup_old_logs(&self, retention: Duration) -> Result<Vec<PathBuf>, LogError> {
        let mut removed = vec![];
        if !self.log_folder.is_dir() {
            return Ok(removed);
        }

        let now = SystemTime::now();
        let threshold = match now.checked_sub(retention) {
            Some(threshold) => threshold,
            None => return Ok(removed),
        };
        let ago = timeago::Formatter::new();

        let entries =
            fs::read_dir(&self.log_folder).map_err(|e| LogError::io(&self.log_folder, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| LogError::io(&self.log_folder, e))?;
            let path = entry.path();
            if !path.is_file() || path.extension().map_or(true, |ext| ext != LOG_EXTENSION) {
                continue;
            }

            let written = match stamped_time(&path) {
                Some(written) => written,
                None => entry
                    .metadata()
                    .and_then(|m| m.modified())
                    .map_err(|e| LogError::io(&path, e))?,
            };
            if written < threshold {
                fs::remove_file(&path).map_err(|e| LogError::io(&path, e))?;
                debug!(
                    target: LOG_TARGET,
                    "Removed old log {} (written {})",
                    path.display(),
                    ago.convert(now.duration_since(written).unwrap_or_default())
                );
                removed.push(path);
            }
        }

        Ok(removed)
    }

    pub fn logger(&self) -> Result<&Dispatch, LogError> {
        self.dispatch.as_ref().ok_or(LogError::NotConfigured)
    }

    /// Installs the configured dispatcher as the process-wide default.
    pub fn install_global(&self) -> Result<(), LogError> {
        tracing::dispatcher::set_global_default(self.logger()?.clone())?;
        Ok(())
    }

    pub fn log_folder(&self) -> &Path {
        &self.log_folder
    }

    /// Files opened by [`LogManager::setup`], info log first.
    pub fn log_files(&self) -> &[PathBuf] {
        &self.log_files
    }
}

fn stamped_time(path: &Path) -> Option<SystemTime> {
    let name = path.file_name()?.to_str()?;
    timestamp::parse_log_stamp(name).map(SystemTime::from)
}

fn file_layer(appender: RollingFileAppender, level: LevelFilter) -> BoxedLayer {
    fmt::layer()
        .with_writer(appender)
        .with_ansi(false)
        .with_thread_names(true)
        .with_filter(level)
        .boxed()
}
