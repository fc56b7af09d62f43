//! # Error Types
//!
//! Errors produced by the level machinery.

use thiserror::Error;

/// Error returned when a level cannot be resolved from user input.
///
/// A failed lookup never touches the threshold it was meant to change, so
/// callers are free to report the error and carry on logging.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelError
{
    /// The name did not match any known severity.
    ///
    /// Accepted names (case-insensitive) are `error`, `warn`, `warning`,
    /// `info` and `debug`. The offending input is kept verbatim.
    #[error("invalid log level name {0:?}: must be one of error, warn, info, debug")]
    InvalidLevelName(String),
}

/// Convenience type alias for `Result<T, LevelError>`
pub type LevelResult<T> = std::result::Result<T, LevelError>;
