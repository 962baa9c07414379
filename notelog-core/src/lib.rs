//! # notelog-core
//!
//! Per-type instrumentation: leveled logging plus an in-memory notes timeline.
//!
//! This library provides:
//! - Level resolution from canonical levels or names
//! - Console and `~/.BAC0/BAC0.log` sinks, degrading to console-only when
//!   the file cannot be created
//! - A chronological notes timeline for dashboards
//! - A process-wide registry binding one shared handle to each host type
//!
//! ## Example
//!
//! ```rust,no_run
//! use notelog_core::Loggable;
//!
//! struct Controller;
//! impl Loggable for Controller {}
//!
//! let controller = Controller;
//! controller.note("device online").expect("non-empty note");
//! controller.log_critical("overtemp").expect("non-empty message");
//!
//! for entry in &controller.notes() {
//!     println!("{} {} {}", entry.timestamp, entry.level, entry.message);
//! }
//! ```

// Re-export commonly used items at the crate root
pub use binder::{bind, global, InstrumentationHandle, Loggable, Registry};
pub use config::{ConsoleStream, DebugLevel, InstrumentationConfig, LoggingConfig};
pub use error::{Error, Result};
pub use level::{normalize, LevelInput, LogLevel};
pub use notes::{NoteEntry, Notes, NotesTimeline};
pub use sink::{CaptureBuffer, ConsoleTarget, SinkConfig, SinkManager};

// Public modules
pub mod binder;
pub mod config;
pub mod error;
pub mod format;
pub mod level;
pub mod logging;
pub mod notes;
pub mod sink;
