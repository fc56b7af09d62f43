//! # varlog-core
//!
//! Severity levels and the shared level cell behind every `varlog` logger.
//!
//! This crate holds the one piece of mutable state a logger family has:
//! the admission threshold. It provides:
//! - [`Severity`]: the closed, ordered set of levels (`error`, `warn`, `info`, `debug`)
//! - [`LevelCell`]: an atomically updated threshold shared by reference
//! - [`LevelError`]: the only error the level machinery produces
//!
//! There is no I/O here. Formatting and emission live in `varlog-logger`.
//!
//! ## Example
//!
//! ```rust
//! use varlog_core::{LevelCell, Severity};
//!
//! let cell = LevelCell::new(Severity::Info);
//! let shared = cell.clone();
//!
//! shared.set_by_counter(3);
//! assert_eq!(cell.get(), Severity::Debug);
//!
//! assert!(cell.set_by_name("verbose").is_err());
//! assert_eq!(cell.get(), Severity::Debug);
//! ```

pub mod error;
pub mod level;
pub mod severity;

pub use error::{LevelError, LevelResult};
pub use level::LevelCell;
pub use severity::Severity;
