//! Single file installation: backup then write-then-rename

use crate::backup::{self, parent_or_current};
use crate::executor::dirs::ensure_dir;
use crate::types::{map_io_error, map_source_error, BackupDecision, InstallError};
use crate::Config;
use filetime::FileTime;
use std::fs::{self, File, Metadata};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// What a successful copy did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyOutcome {
    /// Bytes written to the destination
    pub bytes_copied: u64,
    /// Where the previous destination was moved, if a backup was made
    pub backup: Option<PathBuf>,
}

/// Install `source` at the literal path `destination`.
///
/// 1. Create missing leading directories (with `-D`)
/// 2. Re-validate source and destination against the current filesystem
/// 3. Stream the source into a temporary file beside the destination
/// 4. Apply source timestamps (with `-p`)
/// 5. Move any existing destination to its backup name
/// 6. Rename the temporary file onto the destination
///
/// The destination is never modified if any step before the final rename
/// fails. `on_create_dir` is called for each directory created in step 1.
///
/// # Example
/// ```no_run
/// use winstall::executor::install_file;
/// use winstall::Config;
/// use std::path::Path;
///
/// let config = Config::default();
/// let outcome = install_file(
///     Path::new("build/app.exe"),
///     Path::new("bin/app.exe"),
///     &config,
///     |_| {},
/// )?;
/// println!("{} bytes", outcome.bytes_copied);
/// # Ok::<(), winstall::types::InstallError>(())
/// ```
pub fn install_file<F>(
    source: &Path,
    destination: &Path,
    config: &Config,
    on_create_dir: F,
) -> Result<CopyOutcome, InstallError>
where
    F: FnMut(&Path),
{
    if config.create_leading {
        if let Some(parent) = destination.parent() {
            ensure_dir(parent, on_create_dir)?;
        }
    }

    let src_metadata = fs::metadata(source).map_err(|e| map_source_error(source, e))?;
    if src_metadata.is_dir() {
        return Err(InstallError::OmittingDirectory {
            path: source.to_path_buf(),
        });
    }

    if let Ok(dest_metadata) = fs::metadata(destination) {
        if dest_metadata.is_dir() {
            return Err(InstallError::CannotOverwriteDirectory {
                path: destination.to_path_buf(),
            });
        }
        if is_same_file(source, destination, &src_metadata, &dest_metadata) {
            return Err(InstallError::SameFile {
                source_path: source.to_path_buf(),
                destination: destination.to_path_buf(),
            });
        }
    }

    let mut src_file = File::open(source).map_err(|e| map_source_error(source, e))?;

    let parent = parent_or_current(destination);
    let mut part = NamedTempFile::new_in(parent).map_err(|e| match e.kind() {
        ErrorKind::NotFound => InstallError::NoSuchDirectory {
            path: parent.to_path_buf(),
        },
        _ => map_io_error(destination, e),
    })?;

    let bytes_copied =
        io::copy(&mut src_file, part.as_file_mut()).map_err(|e| map_io_error(destination, e))?;
    part.as_file()
        .sync_all()
        .map_err(|e| map_io_error(destination, e))?;

    copy_permissions(&src_metadata, part.path())?;

    if config.preserve_timestamps {
        let atime = FileTime::from_last_access_time(&src_metadata);
        let mtime = FileTime::from_last_modification_time(&src_metadata);
        // Set through the writing handle; closing it must not touch the times again
        filetime::set_file_handle_times(part.as_file(), Some(atime), Some(mtime))
            .map_err(|e| map_io_error(destination, e))?;
    }

    let backup = match backup::decide(destination, config.backup_mode, &config.backup_suffix)? {
        BackupDecision::NoBackup => None,
        BackupDecision::BackupTo(backup_path) => {
            fs::rename(destination, &backup_path).map_err(|cause| InstallError::Backup {
                path: destination.to_path_buf(),
                backup: backup_path.clone(),
                cause,
            })?;
            Some(backup_path)
        }
    };

    part.persist(destination)
        .map_err(|e| map_io_error(destination, e.error))?;

    tracing::debug!(
        source = %source.display(),
        destination = %destination.display(),
        bytes = bytes_copied,
        "installed file"
    );

    Ok(CopyOutcome {
        bytes_copied,
        backup,
    })
}

fn is_same_file(source: &Path, destination: &Path, src: &Metadata, dest: &Metadata) -> bool {
    if same_inode(src, dest) {
        return true;
    }

    match (fs::canonicalize(source), fs::canonicalize(destination)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(unix)]
fn same_inode(a: &Metadata, b: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    a.dev() == b.dev() && a.ino() == b.ino()
}

#[cfg(not(unix))]
fn same_inode(_: &Metadata, _: &Metadata) -> bool {
    false
}

// Temporary files are created owner-only on unix; give the installed file
// the source's mode instead. Windows attributes are left at their defaults.
#[cfg(unix)]
fn copy_permissions(src_metadata: &Metadata, part_path: &Path) -> Result<(), InstallError> {
    fs::set_permissions(part_path, src_metadata.permissions())
        .map_err(|e| map_io_error(part_path, e))
}

#[cfg(not(unix))]
fn copy_permissions(_: &Metadata, _: &Path) -> Result<(), InstallError> {
    Ok(())
}
