//! # Logger Handles
//!
//! A [`Logger`] is a cheap handle made of three parts:
//! - the family's [`LevelCell`], shared by every handle derived from the same root
//! - the family's emitter, a `tracing` [`Dispatch`] with one formatting layer
//! - this handle's own [`Context`] of bound attributes and open groups
//!
//! Deriving a handle with [`Logger::with`] or [`Logger::with_group`] copies
//! the context and clones the other two by reference. Changing the level on
//! any handle is therefore seen by all of them, including handles created
//! before the change.
//!
//! ## Example
//!
//! ```rust
//! use varlog_logger::{HandlerKind, Logger, Severity, attr};
//!
//! let root = Logger::with_level(std::io::sink(), HandlerKind::Json, Severity::Error);
//! let http = root.with([attr("subsystem", "http")]).with_group("request");
//!
//! assert!(!http.enabled(Severity::Info));
//! root.set_level(Severity::Debug);
//! assert!(http.enabled(Severity::Info));
//! ```

use std::fmt;
use std::io;
use std::sync::Mutex;

use tracing::Dispatch;
use tracing::field;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry, fmt as tracing_fmt};
use varlog_core::{LevelCell, LevelResult, Severity};

use crate::attrs::{Attr, Context};
use crate::error::LoggingError;
use crate::filter::LevelCellFilter;
use crate::format::{JsonFormat, text_fields};
use crate::handler::HandlerKind;

/// `tracing` target of every record emitted through a [`Logger`].
pub const TARGET: &str = "varlog";

/// A logger handle
#[derive(Clone)]
pub struct Logger
{
    dispatch: Dispatch,
    level: LevelCell,
    handler: HandlerKind,
    context: Context,
}

impl Logger
{
    /// Create a root logger writing to `out` with the default level
    /// ([`Severity::Info`]).
    pub fn new<W>(out: W, handler: HandlerKind) -> Self
    where
        W: io::Write + Send + 'static,
    {
        Self::with_level(out, handler, Severity::default())
    }

    /// Create a root logger with an explicit initial level.
    pub fn with_level<W>(out: W, handler: HandlerKind, initial: Severity) -> Self
    where
        W: io::Write + Send + 'static,
    {
        Self::build(out, handler, initial, true)
    }

    /// Like [`with_level`](Self::with_level), but the console handler writes
    /// no ANSI escape codes. Use this for files and other non-terminal sinks.
    pub fn without_ansi<W>(out: W, handler: HandlerKind, initial: Severity) -> Self
    where
        W: io::Write + Send + 'static,
    {
        Self::build(out, handler, initial, false)
    }

    fn build<W>(out: W, handler: HandlerKind, initial: Severity, ansi: bool) -> Self
    where
        W: io::Write + Send + 'static,
    {
        let level = LevelCell::new(initial);
        let dispatch = build_dispatch(out, handler, &level, ansi);
        Self { dispatch, level, handler, context: Context::default() }
    }

    /// Create a root logger from a handler name.
    ///
    /// Unknown names do not fail: a warning goes to standard error and the
    /// JSON handler is used. See [`HandlerKind::resolve`].
    pub fn from_handler_name<W>(out: W, handler: &str) -> Self
    where
        W: io::Write + Send + 'static,
    {
        Self::new(out, HandlerKind::resolve_or_warn(handler))
    }

    /// A derived logger with extra bound attributes.
    ///
    /// The new handle shares this logger's level cell and emitter.
    #[must_use]
    pub fn with(&self, attrs: impl IntoIterator<Item = Attr>) -> Self
    {
        let mut derived = self.clone();
        derived.context.extend(attrs);
        derived
    }

    /// A derived logger whose subsequently bound attributes nest under `name`.
    ///
    /// An empty name returns an equivalent handle.
    #[must_use]
    pub fn with_group(&self, name: &str) -> Self
    {
        let mut derived = self.clone();
        if !name.is_empty() {
            derived.context.push_group(name);
        }
        derived
    }

    /// Current threshold of the family.
    #[must_use]
    pub fn level(&self) -> Severity
    {
        self.level.get()
    }

    /// The shared level cell, for wiring into other components.
    #[must_use]
    pub fn level_cell(&self) -> &LevelCell
    {
        &self.level
    }

    /// Set the threshold for every logger in the family.
    pub fn set_level(&self, severity: Severity)
    {
        self.level.set(severity);
    }

    /// Set the threshold from a verbosity counter (for example repeated `-v`
    /// flags): `0` or less is `error`, `1` is `warn`, `2` is `info`, `3` or
    /// more is `debug`.
    pub fn set_level_by_counter(&self, count: i64) -> Severity
    {
        self.level.set_by_counter(count)
    }

    /// Set the threshold from a case-insensitive level name.
    ///
    /// ## Errors
    ///
    /// Returns [`LevelError::InvalidLevelName`](varlog_core::LevelError::InvalidLevelName)
    /// for unknown names; the threshold is not changed.
    pub fn set_level_by_name(&self, name: &str) -> LevelResult<Severity>
    {
        self.level.set_by_name(name)
    }

    /// Output handler of the family.
    #[must_use]
    pub fn handler(&self) -> HandlerKind
    {
        self.handler
    }

    /// Bound attributes and open groups of this handle.
    #[must_use]
    pub fn context(&self) -> &Context
    {
        &self.context
    }

    /// Whether a record at `severity` would currently be written.
    #[must_use]
    pub fn enabled(&self, severity: Severity) -> bool
    {
        self.level.enabled(severity)
    }

    /// Emit a record with per-record attributes.
    ///
    /// Record attributes nest under this handle's open groups, like bound ones.
    pub fn log(&self, severity: Severity, message: &str, attrs: &[Attr])
    {
        if !self.enabled(severity) {
            return;
        }

        let context = if attrs.is_empty() { None } else { Some(self.context.with_record_attrs(attrs)) };
        let context = context.as_ref().unwrap_or(&self.context);
        let rendered = (!context.is_empty()).then(|| self.render(context));
        let attrs = rendered.as_deref().map(field::display);

        tracing::dispatcher::with_default(&self.dispatch, || match severity {
            Severity::Error => tracing::error!(target: TARGET, attrs, "{message}"),
            Severity::Warn => tracing::warn!(target: TARGET, attrs, "{message}"),
            Severity::Info => tracing::info!(target: TARGET, attrs, "{message}"),
            Severity::Debug => tracing::debug!(target: TARGET, attrs, "{message}"),
        });
    }

    /// Emit an error record without per-record attributes.
    pub fn error(&self, message: &str)
    {
        self.log(Severity::Error, message, &[]);
    }

    /// Emit a warning record without per-record attributes.
    pub fn warn(&self, message: &str)
    {
        self.log(Severity::Warn, message, &[]);
    }

    /// Emit an informational record without per-record attributes.
    pub fn info(&self, message: &str)
    {
        self.log(Severity::Info, message, &[]);
    }

    /// Emit a debug record without per-record attributes.
    pub fn debug(&self, message: &str)
    {
        self.log(Severity::Debug, message, &[]);
    }

    /// Make this family's emitter the process-wide `tracing` default.
    ///
    /// Afterwards plain `tracing::info!` and friends anywhere in the process
    /// go through the same level cell and formatter. Bound attributes of this
    /// handle are not applied to those events.
    ///
    /// ## Errors
    ///
    /// Returns [`LoggingError::InitializationFailed`] if a global default was
    /// already set.
    pub fn install_global(&self) -> Result<(), LoggingError>
    {
        tracing::dispatcher::set_global_default(self.dispatch.clone())
            .map_err(|e| LoggingError::InitializationFailed(e.to_string()))
    }

    fn render(&self, context: &Context) -> String
    {
        match self.handler {
            HandlerKind::Console | HandlerKind::Text => context.to_logfmt(),
            HandlerKind::Json => context.to_json(),
        }
    }
}

impl fmt::Debug for Logger
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("Logger")
            .field("level", &self.level)
            .field("handler", &self.handler)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

/// Build the emitter: a registry with one formatting layer, filtered by the
/// level cell and writing to `out` under a mutex. `ansi` only affects the
/// console handler.
fn build_dispatch<W>(out: W, handler: HandlerKind, level: &LevelCell, ansi: bool) -> Dispatch
where
    W: io::Write + Send + 'static,
{
    let writer = Mutex::new(out);
    let filter = LevelCellFilter::new(level.clone());

    match handler {
        HandlerKind::Console => {
            let layer = tracing_fmt::layer()
                .compact()
                .with_target(false)
                .with_ansi(ansi)
                .with_timer(ChronoUtc::new("%H:%M:%S%.3f".to_string()))
                .fmt_fields(text_fields())
                .with_writer(writer)
                .with_filter(filter);
            Dispatch::new(Registry::default().with(layer))
        }
        HandlerKind::Text => {
            let layer = tracing_fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_timer(ChronoUtc::rfc_3339())
                .fmt_fields(text_fields())
                .with_writer(writer)
                .with_filter(filter);
            Dispatch::new(Registry::default().with(layer))
        }
        HandlerKind::Json => {
            let layer = tracing_fmt::layer().event_format(JsonFormat).with_writer(writer).with_filter(filter);
            Dispatch::new(Registry::default().with(layer))
        }
    }
}
