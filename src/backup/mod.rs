//! Backup naming
//!
//! Computes where an existing destination is moved before it is replaced.
//! Numbered backups are discovered by scanning the destination's directory,
//! so no state is kept between runs.

use crate::types::{map_io_error, BackupDecision, BackupMode, InstallError};
use std::collections::BTreeSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

/// Decide the backup path for `path` under `mode`.
///
/// Returns `NoBackup` when the mode is `None` or when `path` is not an
/// existing regular file.
pub fn decide(path: &Path, mode: BackupMode, suffix: &str) -> Result<BackupDecision, InstallError> {
    if mode == BackupMode::None {
        return Ok(BackupDecision::NoBackup);
    }

    match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => {}
        _ => return Ok(BackupDecision::NoBackup),
    }

    let backup = match mode {
        BackupMode::None => return Ok(BackupDecision::NoBackup),
        BackupMode::Simple => simple_backup_path(path, suffix),
        BackupMode::Numbered => next_numbered_backup(path)?,
        BackupMode::Existing => {
            if existing_backup_numbers(path)?.is_empty() {
                simple_backup_path(path, suffix)
            } else {
                next_numbered_backup(path)?
            }
        }
    };

    tracing::debug!(
        path = %path.display(),
        backup = %backup.display(),
        ?mode,
        "backup decided"
    );

    Ok(BackupDecision::BackupTo(backup))
}

/// `path` with `suffix` appended to its file name
pub fn simple_backup_path(path: &Path, suffix: &str) -> PathBuf {
    append_to_file_name(path, suffix)
}

/// `path.~N~` for the smallest positive `N` not already taken
pub fn next_numbered_backup(path: &Path) -> Result<PathBuf, InstallError> {
    let taken = existing_backup_numbers(path)?;

    let mut number: u64 = 1;
    loop {
        let candidate = numbered_backup_path(path, number);
        if !taken.contains(&number) && fs::symlink_metadata(&candidate).is_err() {
            return Ok(candidate);
        }
        number += 1;
    }
}

/// `path.~N~`
pub fn numbered_backup_path(path: &Path, number: u64) -> PathBuf {
    append_to_file_name(path, &format!(".~{}~", number))
}

/// Numbers of the `path.~N~` siblings currently on disk
pub fn existing_backup_numbers(path: &Path) -> Result<BTreeSet<u64>, InstallError> {
    let Some(file_name) = path.file_name() else {
        return Ok(BTreeSet::new());
    };
    let parent = parent_or_current(path);

    let entries = fs::read_dir(parent).map_err(|e| map_io_error(parent, e))?;

    let mut numbers = BTreeSet::new();
    for entry in entries {
        let entry = entry.map_err(|e| map_io_error(parent, e))?;
        let entry_name = entry.file_name();
        if let Some(number) = parse_backup_number(file_name, &entry_name) {
            numbers.insert(number);
        }
    }

    Ok(numbers)
}

/// Parse `N` out of `<file_name>.~N~`, comparing raw name bytes
fn parse_backup_number(file_name: &OsStr, candidate: &OsStr) -> Option<u64> {
    let name = file_name.as_encoded_bytes();
    let candidate = candidate.as_encoded_bytes();
    if candidate.len() < name.len() || !same_file_name(&candidate[..name.len()], name) {
        return None;
    }

    let digits = candidate[name.len()..]
        .strip_prefix(b".~")?
        .strip_suffix(b"~")?;

    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) || digits[0] == b'0' {
        return None;
    }

    std::str::from_utf8(digits).ok()?.parse().ok()
}

// NTFS names compare case-insensitively
#[cfg(windows)]
fn same_file_name(a: &[u8], b: &[u8]) -> bool {
    a.eq_ignore_ascii_case(b)
}

#[cfg(not(windows))]
fn same_file_name(a: &[u8], b: &[u8]) -> bool {
    a == b
}

fn append_to_file_name(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

/// Parent directory of `path`, with a bare file name mapping to `.`
pub fn parent_or_current(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
