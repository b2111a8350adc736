//! InstallStep, BackupMode and BackupDecision

use super::InstallError;
use std::path::{Path, PathBuf};

/// Step determined by the destination resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallStep {
    /// Create a directory and every missing ancestor
    CreateDirectory(PathBuf),

    /// Copy a single file to a literal destination path
    CopyFile {
        source: PathBuf,
        destination: PathBuf,
    },
}

impl InstallStep {
    /// Short name used in events and logs
    pub fn action_name(&self) -> &'static str {
        match self {
            InstallStep::CreateDirectory(_) => "Mkdir",
            InstallStep::CopyFile { .. } => "Copy",
        }
    }

    /// Path the step writes to
    pub fn path(&self) -> &Path {
        match self {
            InstallStep::CreateDirectory(path) => path,
            InstallStep::CopyFile { destination, .. } => destination,
        }
    }

    pub fn is_copy(&self) -> bool {
        matches!(self, InstallStep::CopyFile { .. })
    }
}

/// How existing destinations are preserved before being overwritten
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackupMode {
    /// Never make backups
    #[default]
    None,

    /// Always make numbered backups (`name.~N~`)
    Numbered,

    /// Numbered if numbered backups already exist, simple otherwise
    Existing,

    /// Always make simple backups (`name<suffix>`)
    Simple,
}

const BACKUP_KEYWORDS: &[(&str, BackupMode)] = &[
    ("none", BackupMode::None),
    ("off", BackupMode::None),
    ("simple", BackupMode::Simple),
    ("never", BackupMode::Simple),
    ("existing", BackupMode::Existing),
    ("nil", BackupMode::Existing),
    ("numbered", BackupMode::Numbered),
    ("t", BackupMode::Numbered),
];

impl BackupMode {
    /// Parse a backup control keyword.
    ///
    /// Accepts every keyword and alias, plus any prefix that selects a single
    /// mode (`num`, `ex`). `context` names where the value came from and ends
    /// up in the error message.
    pub fn parse(value: &str, context: &str) -> Result<Self, InstallError> {
        let invalid = || InstallError::InvalidArgument {
            value: value.to_string(),
            context: context.to_string(),
        };

        if value.is_empty() {
            return Err(invalid());
        }

        if let Some((_, mode)) = BACKUP_KEYWORDS.iter().find(|(name, _)| *name == value) {
            return Ok(*mode);
        }

        let mut candidates = BACKUP_KEYWORDS
            .iter()
            .filter(|(name, _)| name.starts_with(value))
            .map(|(_, mode)| *mode);

        match candidates.next() {
            Some(first) if candidates.all(|mode| mode == first) => Ok(first),
            _ => Err(invalid()),
        }
    }
}

/// Result of consulting the backup namer for one destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupDecision {
    NoBackup,
    BackupTo(PathBuf),
}
