//! Executor module for install steps

pub mod copy;
pub mod dirs;

use crate::plan::InstallPlan;
use crate::types::{InstallError, InstallStep};
use crate::Config;
use std::path::{Path, PathBuf};

/// Execution statistics for an install run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    /// Number of steps in the input plan.
    pub total_steps: usize,
    /// Number of successfully processed steps.
    pub completed_steps: usize,
    /// Number of failed steps.
    pub failed_steps: usize,
    /// Aggregate copied bytes.
    pub bytes_copied: u64,
    /// Number of backups made.
    pub backups_made: usize,
}

impl ExecutionStats {
    /// Whether every step succeeded
    pub fn is_success(&self) -> bool {
        self.failed_steps == 0
    }
}

/// Events emitted while executing a plan.
#[derive(Debug)]
pub enum ExecutionEvent {
    /// A directory is about to be created.
    CreatingDirectory { path: PathBuf },
    /// A file was installed.
    Installed {
        source: PathBuf,
        destination: PathBuf,
        backup: Option<PathBuf>,
    },
    /// A step failed but the executor continued.
    StepFailed { error: InstallError },
}

/// Optional callback used to receive execution events.
pub type ExecutionCallback<'a> = dyn Fn(&ExecutionEvent) + Send + Sync + 'a;

pub use copy::{install_file, CopyOutcome};
pub use dirs::ensure_dir;

/// Execute an install plan
///
/// Executes steps in order and continues past per-step failures. Nothing is
/// rolled back; the returned statistics say how many steps failed.
pub fn execute_plan(
    plan: &InstallPlan,
    config: &Config,
    on_event: Option<&ExecutionCallback<'_>>,
) -> ExecutionStats {
    let mut stats = ExecutionStats {
        total_steps: plan.steps.len(),
        ..Default::default()
    };

    for (idx, step) in plan.steps.iter().enumerate() {
        let announce = |path: &Path| {
            emit_event(
                on_event,
                ExecutionEvent::CreatingDirectory {
                    path: path.to_path_buf(),
                },
            )
        };

        let result = match step {
            InstallStep::CreateDirectory(path) => ensure_dir(path, announce).map(|_| None),
            InstallStep::CopyFile {
                source,
                destination,
            } => install_file(source, destination, config, announce).map(Some),
        };

        match result {
            Ok(outcome) => {
                stats.completed_steps += 1;

                if let (
                    Some(outcome),
                    InstallStep::CopyFile {
                        source,
                        destination,
                    },
                ) = (outcome, step)
                {
                    stats.bytes_copied += outcome.bytes_copied;
                    if outcome.backup.is_some() {
                        stats.backups_made += 1;
                    }

                    emit_event(
                        on_event,
                        ExecutionEvent::Installed {
                            source: source.clone(),
                            destination: destination.clone(),
                            backup: outcome.backup,
                        },
                    );
                }
            }
            Err(err) => {
                stats.failed_steps += 1;
                tracing::debug!(
                    index = idx + 1,
                    total = stats.total_steps,
                    step = step.action_name(),
                    path = %step.path().display(),
                    kind = err.kind_label(),
                    error = %err,
                    "step failed"
                );

                emit_event(on_event, ExecutionEvent::StepFailed { error: err });
            }
        }
    }

    stats
}

fn emit_event(on_event: Option<&ExecutionCallback<'_>>, event: ExecutionEvent) {
    if let Some(callback) = on_event {
        callback(&event);
    }
}
