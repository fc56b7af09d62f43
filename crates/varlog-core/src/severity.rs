//! Severity levels and their conversions.

use std::fmt;
use std::str::FromStr;

use tracing::level_filters::LevelFilter;
use tracing::Level;

use crate::error::LevelError;

/// Log severity
///
/// Variants are ordered by verbosity: `Error < Warn < Info < Debug`. Used as a
/// threshold, a severity admits every record that is at most as verbose as
/// itself, so `Error` is always admitted and `Debug` only when the threshold
/// is `Debug`.
///
/// The discriminants are stable because [`LevelCell`](crate::LevelCell)
/// stores them in an atomic byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum Severity
{
    /// Failures that need attention
    Error = 0,
    /// Unexpected but recoverable conditions
    Warn = 1,
    /// Normal operational messages (default)
    #[default]
    Info = 2,
    /// Detailed diagnostic output
    Debug = 3,
}

impl Severity
{
    /// Every severity, from least to most verbose.
    pub const ALL: [Severity; 4] = [Severity::Error, Severity::Warn, Severity::Info, Severity::Debug];

    /// Canonical lowercase name, accepted back by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str
    {
        match self {
            Severity::Error => "error",
            Severity::Warn => "warn",
            Severity::Info => "info",
            Severity::Debug => "debug",
        }
    }

    /// Maps a verbosity counter (for example the number of `-v` flags) to a severity.
    ///
    /// `0` or less is `Error`, `1` is `Warn`, `2` is `Info` and `3` or more is
    /// `Debug`. Total over all integers.
    ///
    /// ```rust
    /// use varlog_core::Severity;
    ///
    /// assert_eq!(Severity::from_verbosity(-5), Severity::Error);
    /// assert_eq!(Severity::from_verbosity(2), Severity::Info);
    /// assert_eq!(Severity::from_verbosity(100), Severity::Debug);
    /// ```
    #[must_use]
    pub const fn from_verbosity(count: i64) -> Self
    {
        match count {
            i64::MIN..=0 => Severity::Error,
            1 => Severity::Warn,
            2 => Severity::Info,
            _ => Severity::Debug,
        }
    }

    /// Whether a threshold of `self` admits a record at `record` severity.
    #[must_use]
    pub fn admits(self, record: Severity) -> bool
    {
        record <= self
    }

    /// One step more verbose, saturating at `Debug`.
    #[must_use]
    pub const fn more_verbose(self) -> Self
    {
        match self {
            Severity::Error => Severity::Warn,
            Severity::Warn => Severity::Info,
            Severity::Info | Severity::Debug => Severity::Debug,
        }
    }

    /// One step less verbose, saturating at `Error`.
    #[must_use]
    pub const fn less_verbose(self) -> Self
    {
        match self {
            Severity::Error | Severity::Warn => Severity::Error,
            Severity::Info => Severity::Warn,
            Severity::Debug => Severity::Info,
        }
    }

    pub(crate) const fn to_repr(self) -> u8
    {
        self as u8
    }

    pub(crate) const fn from_repr(repr: u8) -> Option<Self>
    {
        match repr {
            0 => Some(Severity::Error),
            1 => Some(Severity::Warn),
            2 => Some(Severity::Info),
            3 => Some(Severity::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for Severity
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity
{
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warn" | "warning" => Ok(Severity::Warn),
            "info" => Ok(Severity::Info),
            "debug" => Ok(Severity::Debug),
            _ => Err(LevelError::InvalidLevelName(s.to_string())),
        }
    }
}

impl From<Severity> for Level
{
    fn from(severity: Severity) -> Self
    {
        match severity {
            Severity::Error => Level::ERROR,
            Severity::Warn => Level::WARN,
            Severity::Info => Level::INFO,
            Severity::Debug => Level::DEBUG,
        }
    }
}

impl From<Severity> for LevelFilter
{
    fn from(severity: Severity) -> Self
    {
        LevelFilter::from_level(severity.into())
    }
}

/// `TRACE` has no counterpart and collapses into `Debug`.
impl From<Level> for Severity
{
    fn from(level: Level) -> Self
    {
        match level {
            Level::ERROR => Severity::Error,
            Level::WARN => Severity::Warn,
            Level::INFO => Severity::Info,
            _ => Severity::Debug,
        }
    }
}
