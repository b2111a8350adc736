//! Core type definitions for winstall

mod action;
mod error;

pub use action::{BackupDecision, BackupMode, InstallStep};
pub use error::{map_io_error, map_source_error, InstallError};
