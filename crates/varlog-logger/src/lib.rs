//! # varlog-logger
//!
//! Logger handles with a shared runtime level for `varlog`.
//!
//! A [`Logger`] pairs a `tracing` dispatcher (the emitter, writing console,
//! text or JSON output to a sink of your choice) with a
//! [`LevelCell`](varlog_core::LevelCell). Loggers derived through
//! [`Logger::with`] and [`Logger::with_group`] carry extra attributes but
//! share the root's level cell, so one call to [`Logger::set_level`] retunes
//! the whole family.
//!
//! ## Quick Start
//!
//! ```rust
//! use varlog_logger::{HandlerKind, Logger, Severity, attr};
//!
//! let root = Logger::new(std::io::stderr(), HandlerKind::Text);
//! let db = root.with([attr("subsystem", "db")]);
//!
//! root.set_level_by_counter(3);
//! db.debug("connection pool warmed up");
//! assert_eq!(db.level(), Severity::Debug);
//! ```
//!
//! ## Environment Variables
//!
//! [`init_logging`] reads its configuration from:
//! - `VARLOG_HANDLER`: output handler (`console`, `text` or `json`, default: `console`)
//! - `VARLOG_LEVEL`: initial level (`error`, `warn`, `info`, `debug`, default: `info`)
//! - `VARLOG_LOG_FILE`: optional file to append to instead of stdout

pub mod attrs;
pub mod config;
pub mod error;
pub mod filter;
pub mod format;
pub mod handler;
pub mod logger;

pub use attrs::{Attr, attr};
pub use config::{LoggerConfig, init_logging, init_logging_with_level};
pub use error::LoggingError;
pub use handler::HandlerKind;
pub use logger::Logger;
pub use varlog_core::{LevelCell, LevelError, Severity};
