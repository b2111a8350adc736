//! Error types for winstall

use std::io::{Error, ErrorKind};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error types for install operations
#[derive(Debug, Error)]
pub enum InstallError {
    /// Bad flag combination or operand count
    #[error("{0}")]
    Usage(String),

    /// Unrecognised or ambiguous value for a keyword argument
    #[error(
        "invalid argument '{value}' for '{context}'\n\
         Valid arguments are:\n  \
         - 'none', 'off'\n  \
         - 'simple', 'never'\n  \
         - 'existing', 'nil'\n  \
         - 'numbered', 't'"
    )]
    InvalidArgument { value: String, context: String },

    /// Target directory does not exist
    #[error("target directory '{}' does not exist", path.display())]
    NoSuchDirectory { path: PathBuf },

    /// Path exists but is not a directory
    #[error("'{}' is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    /// Source and destination resolve to the same file
    #[error("'{}' and '{}' are the same file", source_path.display(), destination.display())]
    SameFile {
        source_path: PathBuf,
        destination: PathBuf,
    },

    /// Source file could not be found
    #[error("cannot stat '{}': No such file or directory", path.display())]
    SourceNotFound { path: PathBuf },

    /// Access denied for specific path
    #[error("Permission denied: '{}'", path.display())]
    PermissionDenied { path: PathBuf },

    /// Source operand is a directory
    #[error("omitting directory '{}'", path.display())]
    OmittingDirectory { path: PathBuf },

    /// Destination is a directory and cannot be replaced by a file
    #[error("cannot overwrite directory '{}' with non-directory", path.display())]
    CannotOverwriteDirectory { path: PathBuf },

    /// Existing destination could not be moved to its backup name
    #[error("cannot backup '{}' to '{}': {cause}", path.display(), backup.display())]
    Backup {
        path: PathBuf,
        backup: PathBuf,
        #[source]
        cause: Error,
    },

    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] Error),
}

impl InstallError {
    /// Check if this error prevents any plan from running
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            InstallError::Usage(_) | InstallError::InvalidArgument { .. }
        )
    }

    /// Short label used when grouping failures
    pub fn kind_label(&self) -> &'static str {
        match self {
            InstallError::Usage(_) | InstallError::InvalidArgument { .. } => "Usage error",
            InstallError::NoSuchDirectory { .. } => "No such directory",
            InstallError::NotADirectory { .. } => "Not a directory",
            InstallError::SameFile { .. } => "Same file",
            InstallError::SourceNotFound { .. } => "Source not found",
            InstallError::PermissionDenied { .. } => "Permission denied",
            InstallError::OmittingDirectory { .. } => "Directory operand",
            InstallError::CannotOverwriteDirectory { .. } => "Directory destination",
            InstallError::Backup { .. } => "Backup failed",
            InstallError::Io(_) => "I/O error",
        }
    }
}

/// Map an IO error on `path` to the install taxonomy.
///
/// Access-control denials always become `PermissionDenied`; everything else
/// stays a generic IO error.
pub fn map_io_error(path: &Path, error: Error) -> InstallError {
    match error.kind() {
        ErrorKind::PermissionDenied => InstallError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => InstallError::Io(error),
    }
}

/// Like [`map_io_error`], but a missing path is reported as `SourceNotFound`.
pub fn map_source_error(path: &Path, error: Error) -> InstallError {
    match error.kind() {
        ErrorKind::NotFound => InstallError::SourceNotFound {
            path: path.to_path_buf(),
        },
        _ => map_io_error(path, error),
    }
}
