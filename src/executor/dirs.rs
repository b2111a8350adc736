//! Directory creation with all missing ancestors

use crate::types::{map_io_error, InstallError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Ensure `path` exists as a directory, creating every missing ancestor.
///
/// `on_create` is called with each directory immediately before it is
/// created. Succeeds without side effects when the directory already exists.
///
/// # Errors
/// * `NotADirectory` - a component exists but is not a directory
/// * `PermissionDenied` - a component could not be created due to access control
///
/// # Example
/// ```no_run
/// use winstall::executor::ensure_dir;
/// use std::path::Path;
///
/// ensure_dir(Path::new("out/bin"), |dir| println!("creating {}", dir.display()))?;
/// # Ok::<(), winstall::types::InstallError>(())
/// ```
pub fn ensure_dir<F>(path: &Path, mut on_create: F) -> Result<(), InstallError>
where
    F: FnMut(&Path),
{
    if path.as_os_str().is_empty() || path.is_dir() {
        return Ok(());
    }

    let mut chain: Vec<PathBuf> = path
        .ancestors()
        .filter(|ancestor| !ancestor.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .collect();
    chain.reverse();

    for component in chain {
        match fs::metadata(&component) {
            Ok(metadata) if metadata.is_dir() => continue,
            Ok(_) => return Err(InstallError::NotADirectory { path: component }),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(map_io_error(&component, e)),
        }

        on_create(&component);
        tracing::debug!(path = %component.display(), "creating directory");

        match fs::create_dir(&component) {
            Ok(()) => {}
            // Lost a race with another writer; fine as long as it is a directory
            Err(e) if e.kind() == ErrorKind::AlreadyExists && component.is_dir() => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(InstallError::NotADirectory { path: component })
            }
            Err(e) => return Err(map_io_error(&component, e)),
        }
    }

    Ok(())
}
