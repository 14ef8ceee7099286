//! Session-scoped client logging: bounded history, console mirroring,
//! collector delivery for errors, and process-level failure hooks.

pub mod buffer;
pub mod entry;
pub mod hooks;
pub mod level;
pub mod logger;
pub mod mirror;
pub mod session;
pub mod transport;

pub use entry::LogEntry;
pub use level::LogLevel;
pub use logger::{ClientLogger, LogExport};
