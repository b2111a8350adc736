//! Main install command

use crate::executor::{execute_plan, ExecutionEvent, ExecutionStats};
use crate::plan::resolve_plan;
use crate::types::InstallError;
use crate::ui::Reporter;
use crate::Config;

/// Exit status when at least one step failed
pub const EXIT_FAILURE: u8 = 1;

/// Exit status for invalid invocations and unusable target directories
pub const EXIT_USAGE: u8 = 2;

/// Run the install operation, reporting to stdout and stderr
pub fn run(config: &Config) -> Result<ExecutionStats, InstallError> {
    run_with_reporter(config, &Reporter::new(config.verbose))
}

/// Run the install operation with a caller-supplied reporter
///
/// Planning errors are returned before anything on disk changes. Once
/// execution starts every step runs; per-step failures are reported and
/// counted in the returned statistics.
pub fn run_with_reporter(
    config: &Config,
    reporter: &Reporter,
) -> Result<ExecutionStats, InstallError> {
    let plan = resolve_plan(config)?;
    tracing::debug!(
        backups = config.make_backups(),
        mode = ?config.backup_mode,
        suffix = %config.backup_suffix,
        "starting install"
    );

    let on_event = |event: &ExecutionEvent| reporter.handle(event);
    let stats = execute_plan(&plan, config, Some(&on_event));

    tracing::debug!(
        completed = stats.completed_steps,
        failed = stats.failed_steps,
        bytes = stats.bytes_copied,
        backups = stats.backups_made,
        "install finished"
    );

    Ok(stats)
}

/// Process exit status for a finished run
pub fn exit_status(result: &Result<ExecutionStats, InstallError>) -> u8 {
    match result {
        Ok(stats) if stats.is_success() => 0,
        Ok(_) => EXIT_FAILURE,
        Err(_) => EXIT_USAGE,
    }
}
