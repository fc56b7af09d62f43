//! # Level Cell
//!
//! The shared admission threshold of a logger family.
//!
//! A [`LevelCell`] is created once per family and then handed out by
//! reference: cloning the cell clones the `Arc`, never the value. Every logger
//! derived from the same root therefore observes a change made through any
//! one of them.
//!
//! ## Concurrency
//!
//! The value is a single `AtomicU8` holding the [`Severity`] discriminant.
//! Loads and stores are `Relaxed`: readers always see a complete value that
//! some writer stored, and concurrent writers resolve in the atomic's
//! modification order. Nothing else is published through the cell, so no
//! stronger ordering is needed.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use tracing::level_filters::LevelFilter;
use tracing::Level;

use crate::error::LevelResult;
use crate::severity::Severity;

/// Shared, mutable severity threshold
///
/// ## Example
///
/// ```rust
/// use varlog_core::{LevelCell, Severity};
///
/// let root = LevelCell::new(Severity::Error);
/// let child = root.clone();
///
/// child.set(Severity::Debug);
/// assert!(root.enabled(Severity::Debug));
/// assert!(root.same_cell(&child));
/// ```
#[derive(Clone)]
pub struct LevelCell
{
    inner: Arc<AtomicU8>,
}

impl LevelCell
{
    /// Create a fresh cell. This is the only way to get a cell that is not
    /// shared with an existing family.
    #[must_use]
    pub fn new(initial: Severity) -> Self
    {
        Self { inner: Arc::new(AtomicU8::new(initial.to_repr())) }
    }

    /// Current threshold.
    #[must_use]
    pub fn get(&self) -> Severity
    {
        let repr = self.inner.load(Ordering::Relaxed);
        // Only `set` writes to the atomic, and it only writes valid discriminants.
        Severity::from_repr(repr).unwrap_or_else(|| unreachable!("level cell holds invalid severity {repr}"))
    }

    /// Overwrite the threshold for the whole family.
    pub fn set(&self, severity: Severity)
    {
        self.inner.store(severity.to_repr(), Ordering::Relaxed);
    }

    /// Set the threshold from a verbosity counter.
    ///
    /// See [`Severity::from_verbosity`] for the mapping.
    pub fn set_by_counter(&self, count: i64) -> Severity
    {
        let severity = Severity::from_verbosity(count);
        self.set(severity);
        severity
    }

    /// Set the threshold from a case-insensitive level name.
    ///
    /// ## Errors
    ///
    /// Returns [`LevelError::InvalidLevelName`](crate::LevelError::InvalidLevelName)
    /// if the name is unknown. The threshold is left unchanged in that case.
    pub fn set_by_name(&self, name: &str) -> LevelResult<Severity>
    {
        let severity = name.parse::<Severity>()?;
        self.set(severity);
        Ok(severity)
    }

    /// Whether a record at `severity` passes the current threshold.
    #[must_use]
    pub fn enabled(&self, severity: Severity) -> bool
    {
        self.get().admits(severity)
    }

    /// Admission check for a `tracing` level, used at the subscriber boundary.
    #[must_use]
    pub fn admits_level(&self, level: &Level) -> bool
    {
        *level <= LevelFilter::from(self.get())
    }

    /// Whether both handles point at the same underlying cell.
    #[must_use]
    pub fn same_cell(&self, other: &LevelCell) -> bool
    {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for LevelCell
{
    fn default() -> Self
    {
        Self::new(Severity::default())
    }
}

impl fmt::Debug for LevelCell
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_tuple("LevelCell").field(&self.get()).finish()
    }
}
