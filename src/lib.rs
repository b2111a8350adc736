//! # winstall - GNU-style file installer
//!
//! Copies files into place and creates directories with the semantics of
//! GNU `install`: destination resolution, leading-directory creation,
//! numbered and simple backups, and optional timestamp preservation.
//!
//! Ownership, mode, stripping and security-context options are accepted for
//! compatibility and ignored.

// Module declarations
pub mod backup;
pub mod commands;
pub mod config;
pub mod executor;
pub mod plan;
pub mod types;
pub mod ui;

// Re-export commonly used types
pub use config::Config;
pub use types::{BackupDecision, BackupMode, InstallError, InstallStep};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
