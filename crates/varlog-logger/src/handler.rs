//! # Handler Selection
//!
//! Which formatter a logger family writes with.
//!
//! Selection by name has two deliberately different paths:
//! - [`HandlerKind::from_str`](std::str::FromStr) is strict and returns an
//!   error, for callers such as CLI parsers that want to reject bad input.
//! - [`HandlerKind::resolve`] never fails. An unknown name produces a warning
//!   on the diagnostics stream and selects [`HandlerKind::Json`], so a logger
//!   always gets built.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use crate::error::LoggingError;

/// Output handler type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HandlerKind
{
    /// Compact, coloured, human-readable output (default)
    #[default]
    Console,
    /// Plain `key=value` text without colours
    Text,
    /// One JSON object per line
    Json,
}

impl HandlerKind
{
    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str
    {
        match self {
            HandlerKind::Console => "console",
            HandlerKind::Text => "text",
            HandlerKind::Json => "json",
        }
    }

    /// Whether `name` selects a handler without falling back.
    #[must_use]
    pub fn is_valid_name(name: &str) -> bool
    {
        name.parse::<HandlerKind>().is_ok()
    }

    /// Resolve a handler name, falling back to JSON on unknown input.
    ///
    /// The fallback writes a single warning line to `diagnostics`. Failing to
    /// write the warning is ignored; the fallback still happens.
    ///
    /// ```rust
    /// use varlog_logger::HandlerKind;
    ///
    /// let mut diagnostics = Vec::new();
    /// assert_eq!(HandlerKind::resolve("bogus", &mut diagnostics), HandlerKind::Json);
    /// assert_eq!(
    ///     String::from_utf8(diagnostics).unwrap(),
    ///     "warning: invalid handler type \"bogus\", falling back to JSON\n"
    /// );
    /// ```
    pub fn resolve<W>(name: &str, diagnostics: &mut W) -> HandlerKind
    where
        W: Write + ?Sized,
    {
        match name.parse::<HandlerKind>() {
            Ok(kind) => kind,
            Err(_) => {
                let _ = writeln!(diagnostics, "warning: invalid handler type {name:?}, falling back to JSON");
                HandlerKind::Json
            }
        }
    }

    /// [`resolve`](Self::resolve) with the warning sent to standard error.
    #[must_use]
    pub fn resolve_or_warn(name: &str) -> HandlerKind
    {
        Self::resolve(name, &mut io::stderr().lock())
    }
}

impl fmt::Display for HandlerKind
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.as_str())
    }
}

impl FromStr for HandlerKind
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s {
            "console" => Ok(HandlerKind::Console),
            "text" => Ok(HandlerKind::Text),
            "json" => Ok(HandlerKind::Json),
            _ => Err(LoggingError::InvalidHandler(s.to_string())),
        }
    }
}
