//! Installation planning

mod resolve;

pub use resolve::resolve_plan;

use crate::types::InstallStep;

/// Ordered install steps and statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    /// Steps in execution order
    pub steps: Vec<InstallStep>,

    /// Aggregate statistics about the plan
    pub stats: PlanStats,
}

impl InstallPlan {
    /// Create a new empty plan
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            stats: PlanStats::default(),
        }
    }

    /// Add a step to the plan and update statistics
    pub fn add_step(&mut self, step: InstallStep) {
        if step.is_copy() {
            self.stats.copy_count += 1;
        } else {
            self.stats.directory_count += 1;
        }

        self.steps.push(step);
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Default for InstallPlan {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about an install plan
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlanStats {
    /// Number of `CreateDirectory` steps
    pub directory_count: usize,

    /// Number of `CopyFile` steps
    pub copy_count: usize,
}
