// SPDX-License-Identifier: MIT

//! Run status as a tagged variant, shared between [`crate::JobRun`] and
//! [`crate::TaskRun`].

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Never started, or reset by a restart.
    NoRun,
    /// Currently executing.
    Running,
    /// Completed with zero exit.
    Success,
    /// Completed with non-zero exit, cancelled, timed out, or template error.
    Failure,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunStatus::Success | RunStatus::Failure)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStatus::NoRun => "no_run",
            RunStatus::Running => "running",
            RunStatus::Success => "success",
            RunStatus::Failure => "failure",
        };
        write!(f, "{s}")
    }
}

/// Derive a JobRun's status from its TaskRuns.
///
/// Iterates in order: `Failure` wins immediately; else `Running` wins;
/// `NoRun` is treated as a failure signal ("reset but never restarted").
/// Only when every TaskRun is `Success` is the JobRun `Success`.
pub fn derive_job_run_status<'a>(task_statuses: impl Iterator<Item = &'a RunStatus>) -> RunStatus {
    let mut saw_running = false;
    for status in task_statuses {
        match status {
            RunStatus::Failure => return RunStatus::Failure,
            RunStatus::NoRun => return RunStatus::Failure,
            RunStatus::Running => saw_running = true,
            RunStatus::Success => {}
        }
    }
    if saw_running {
        RunStatus::Running
    } else {
        RunStatus::Success
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
