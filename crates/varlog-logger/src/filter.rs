//! Per-layer filter that reads a [`LevelCell`] on every record.

use tracing::subscriber::Interest;
use tracing::Metadata;
use tracing_subscriber::layer::{Context, Filter};
use varlog_core::LevelCell;

/// `tracing-subscriber` filter backed by a shared [`LevelCell`].
///
/// Callsite interest is always `sometimes`, so `tracing` never caches an
/// admission decision and a level change applies to the very next record.
#[derive(Debug, Clone)]
pub struct LevelCellFilter
{
    level: LevelCell,
}

impl LevelCellFilter
{
    /// Filter admitting records at or below the cell's current threshold.
    #[must_use]
    pub fn new(level: LevelCell) -> Self
    {
        Self { level }
    }

    /// The cell this filter consults.
    #[must_use]
    pub fn level(&self) -> &LevelCell
    {
        &self.level
    }
}

impl<S> Filter<S> for LevelCellFilter
{
    fn enabled(&self, metadata: &Metadata<'_>, _cx: &Context<'_, S>) -> bool
    {
        self.level.admits_level(metadata.level())
    }

    fn callsite_enabled(&self, _metadata: &'static Metadata<'static>) -> Interest
    {
        Interest::sometimes()
    }
}
