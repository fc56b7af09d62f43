//! # Configuration
//!
//! Environment-driven setup for applications that want one process-wide
//! logger family.
//!
//! ## Environment Variables
//!
//! - `VARLOG_HANDLER`: output handler (`console`, `text` or `json`, default:
//!   `console`). Unknown values fall back to JSON with a warning on stderr.
//! - `VARLOG_LEVEL`: initial level (`error`, `warn`, `info`, `debug`,
//!   default: `info`). Unknown values are an error.
//! - `VARLOG_LOG_FILE`: optional path. When set, records are appended to this
//!   file instead of stdout.
//!
//! ## Example
//!
//! ```rust,no_run
//! use varlog_logger::init_logging;
//!
//! let logger = init_logging().expect("Failed to initialize logging");
//! tracing::info!("Application started");
//!
//! // Later, e.g. from a signal handler
//! logger.set_level_by_counter(3);
//! ```

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use tracing_appender::rolling::{RollingFileAppender, Rotation};

use varlog_core::Severity;

use crate::error::LoggingError;
use crate::handler::HandlerKind;
use crate::logger::Logger;

/// Environment variable selecting the handler.
pub const HANDLER_ENV: &str = "VARLOG_HANDLER";
/// Environment variable selecting the initial level.
pub const LEVEL_ENV: &str = "VARLOG_LEVEL";
/// Environment variable naming an output file.
pub const LOG_FILE_ENV: &str = "VARLOG_LOG_FILE";

/// Resolved logger configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoggerConfig
{
    /// Output handler
    pub handler: HandlerKind,
    /// Initial level of the family
    pub level: Severity,
    /// Append to this file instead of stdout
    pub log_file: Option<PathBuf>,
}

impl LoggerConfig
{
    /// Read the configuration from the process environment.
    ///
    /// ## Errors
    ///
    /// Returns [`LoggingError::InvalidLevel`] if `VARLOG_LEVEL` is not a level name.
    pub fn from_env() -> Result<Self, LoggingError>
    {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name to
    /// its value. Handler fallback warnings go to stderr.
    ///
    /// ## Errors
    ///
    /// Returns [`LoggingError::InvalidLevel`] if the level is not a level name.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LoggingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup_with_diagnostics(lookup, &mut io::stderr().lock())
    }

    fn from_lookup_with_diagnostics<F, D>(lookup: F, diagnostics: &mut D) -> Result<Self, LoggingError>
    where
        F: Fn(&str) -> Option<String>,
        D: io::Write + ?Sized,
    {
        let handler = lookup(HANDLER_ENV)
            .filter(|name| !name.is_empty())
            .map_or_else(HandlerKind::default, |name| HandlerKind::resolve(&name, diagnostics));

        let level = match lookup(LEVEL_ENV).filter(|name| !name.is_empty()) {
            Some(name) => name.parse::<Severity>()?,
            None => Severity::default(),
        };

        let log_file = lookup(LOG_FILE_ENV).filter(|path| !path.is_empty()).map(PathBuf::from);

        Ok(Self { handler, level, log_file })
    }

    /// Build a root logger from this configuration.
    ///
    /// Stdout output keeps ANSI colours for the console handler; file output
    /// never contains escape codes.
    ///
    /// ## Errors
    ///
    /// Returns [`LoggingError::FileError`] if the log file path has no file
    /// name, or [`LoggingError::AppenderError`] if the file cannot be opened.
    pub fn build(&self) -> Result<Logger, LoggingError>
    {
        match &self.log_file {
            Some(path) => {
                let appender = file_appender(path)?;
                Ok(Logger::without_ansi(appender, self.handler, self.level))
            }
            None => Ok(Logger::with_level(io::stdout(), self.handler, self.level)),
        }
    }
}

/// Append-only file writer. The date is never added to the name and the
/// file is never rotated, so `path` is exactly the file written.
fn file_appender(path: &Path) -> Result<RollingFileAppender, LoggingError>
{
    let file_name = path.file_name().ok_or_else(|| {
        LoggingError::FileError(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("log file path {} has no file name", path.display()),
        ))
    })?;
    let directory = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(directory)?;
    Ok(appender)
}

/// Initialize process-wide logging from the environment
///
/// Builds a root logger from [`LoggerConfig::from_env`], installs it as the
/// global `tracing` default and returns it, so the caller keeps the level
/// knob for the whole process.
///
/// ## Errors
///
/// Returns an error if:
/// - `VARLOG_LEVEL` is not a level name
/// - the log file cannot be opened
/// - a global default was already installed
pub fn init_logging() -> Result<Logger, LoggingError>
{
    let logger = LoggerConfig::from_env()?.build()?;
    logger.install_global()?;
    Ok(logger)
}

/// Initialize process-wide logging to stdout with an explicit level and handler.
///
/// ## Errors
///
/// Returns an error if a global default was already installed.
pub fn init_logging_with_level(level: Severity, handler: HandlerKind) -> Result<Logger, LoggingError>
{
    let config = LoggerConfig { handler, level, log_file: None };
    let logger = config.build()?;
    logger.install_global()?;
    Ok(logger)
}
