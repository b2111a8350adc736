//! Destination resolution: operands and flags to an install plan

use crate::plan::InstallPlan;
use crate::types::{InstallError, InstallStep};
use crate::Config;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolve the configured operands into an install plan
///
/// Mode selection, in priority order:
/// 1. `-d`: every operand is a directory to create
/// 2. `-t DIR`: every operand is a source copied into `DIR`
/// 3. `SOURCE DEST` with `-T`, or a single source whose `DEST` is not an
///    existing directory: `DEST` is a literal file path
/// 4. Otherwise `SOURCE... DIRECTORY`: sources copied into an existing
///    directory by base name
///
/// Fails before touching the filesystem when the operands or flags do not
/// describe a valid invocation, or when the target directory is unusable.
///
/// # Example
/// ```
/// use winstall::plan::resolve_plan;
/// use winstall::types::InstallStep;
/// use winstall::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     directory_args: true,
///     operands: vec![PathBuf::from("out/bin")],
///     ..Config::default()
/// };
///
/// let plan = resolve_plan(&config).unwrap();
/// assert_eq!(plan.steps, vec![InstallStep::CreateDirectory(PathBuf::from("out/bin"))]);
/// ```
pub fn resolve_plan(config: &Config) -> Result<InstallPlan, InstallError> {
    config.validate()?;

    let operands = config.operands.as_slice();

    if config.directory_args {
        if operands.is_empty() {
            return Err(usage("missing file operand"));
        }

        let mut plan = InstallPlan::new();
        for directory in operands {
            plan.add_step(InstallStep::CreateDirectory(directory.clone()));
        }
        return Ok(log_plan(plan, "directories"));
    }

    if let Some(target) = config.target() {
        if operands.is_empty() {
            return Err(usage("missing file operand"));
        }
        let plan = into_directory(operands, target, config.create_leading)?;
        return Ok(log_plan(plan, "target directory"));
    }

    let Some((destination, sources)) = operands.split_last() else {
        return Err(usage("missing file operand"));
    };
    if sources.is_empty() {
        return Err(usage(format!(
            "missing destination file operand after '{}'",
            destination.display()
        )));
    }

    if config.no_target_directory {
        if let [source] = sources {
            return Ok(log_plan(single_file(source, destination), "single file"));
        }
        return Err(usage(format!("extra operand '{}'", operands[2].display())));
    }

    if config.create_leading && sources.len() != 1 {
        return Err(usage(
            "option -D requires exactly one SOURCE and DEST, or --target-directory",
        ));
    }

    if let [source] = sources {
        if !destination.is_dir() {
            return Ok(log_plan(single_file(source, destination), "single file"));
        }
    }

    let plan = into_directory(sources, destination, false)?;
    Ok(log_plan(plan, "into directory"))
}

fn single_file(source: &Path, destination: &Path) -> InstallPlan {
    let mut plan = InstallPlan::new();
    plan.add_step(InstallStep::CopyFile {
        source: source.to_path_buf(),
        destination: destination.to_path_buf(),
    });
    plan
}

fn into_directory(
    sources: &[PathBuf],
    target: &Path,
    create_target: bool,
) -> Result<InstallPlan, InstallError> {
    let mut plan = InstallPlan::new();

    match fs::metadata(target) {
        Ok(metadata) if metadata.is_dir() => {}
        Ok(_) => {
            return Err(InstallError::NotADirectory {
                path: target.to_path_buf(),
            })
        }
        Err(_) if create_target => {
            plan.add_step(InstallStep::CreateDirectory(target.to_path_buf()));
        }
        Err(_) => {
            return Err(InstallError::NoSuchDirectory {
                path: target.to_path_buf(),
            })
        }
    }

    for source in sources {
        plan.add_step(InstallStep::CopyFile {
            source: source.clone(),
            destination: target.join(base_name(source)),
        });
    }

    Ok(plan)
}

// Sources without a final component (`..`, `/`) keep their full spelling;
// the executor rejects them as directories.
fn base_name(source: &Path) -> &std::ffi::OsStr {
    source.file_name().unwrap_or(source.as_os_str())
}

fn usage(message: impl Into<String>) -> InstallError {
    InstallError::Usage(message.into())
}

fn log_plan(plan: InstallPlan, mode: &str) -> InstallPlan {
    tracing::debug!(
        mode,
        directories = plan.stats.directory_count,
        copies = plan.stats.copy_count,
        "resolved install plan"
    );
    plan
}
