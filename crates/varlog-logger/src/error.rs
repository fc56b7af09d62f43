//! Logger construction and configuration errors.

use std::io;

use varlog_core::LevelError;

/// Logging setup error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError
{
    /// Invalid log level name
    #[error("Invalid log level: {0}")]
    InvalidLevel(#[from] LevelError),

    /// Unknown handler name, returned only by the strict parser
    #[error("Invalid handler type {0:?}: must be one of console, text, json")]
    InvalidHandler(String),

    /// A global default was already installed
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),

    /// File logging error
    #[error("File logging error: {0}")]
    FileError(#[from] io::Error),

    /// The log file appender could not be created
    #[error("Failed to open log file: {0}")]
    AppenderError(#[from] tracing_appender::rolling::InitError),
}
