// SPDX-License-Identifier: MIT

//! JobRun / TaskRun: one execution attempt of a Job, and of a single Task
//! within it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::status::{derive_job_run_status, RunStatus};

/// One execution attempt of a single Task inside a JobRun.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRun {
    /// Ordinal index within the JobRun's flattened task order.
    pub index: usize,
    pub task_name: String,
    pub command_template: String,
    #[serde(default)]
    pub rendered_command: String,
    pub status: RunStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub attempt: u32,
    pub retries: u32,
    pub timeout_secs: u32,
    pub emails: Vec<String>,
    /// Path (or empty string) to the persisted log artifact.
    #[serde(default)]
    pub log_path: String,
    /// Captured stdout+stderr, kept in memory for `/lastoutput` even when
    /// disk logging is disabled.
    #[serde(default)]
    pub output: String,
}

impl TaskRun {
    pub fn new_baseline(
        index: usize,
        task_name: String,
        command_template: String,
        retries: u32,
        timeout_secs: u32,
        emails: Vec<String>,
    ) -> Self {
        Self {
            index,
            task_name,
            command_template,
            rendered_command: String::new(),
            status: RunStatus::NoRun,
            start_time: None,
            end_time: None,
            attempt: 0,
            retries,
            timeout_secs,
            emails,
            log_path: String::new(),
            output: String::new(),
        }
    }

    /// Reset to baseline for a restart: status NoRun, zero times, empty
    /// rendered-cmd, zero attempt, empty log ref.
    pub fn reset_to_baseline(&mut self) {
        self.rendered_command.clear();
        self.status = RunStatus::NoRun;
        self.start_time = None;
        self.end_time = None;
        self.attempt = 0;
        self.log_path.clear();
        self.output.clear();
    }
}

/// One execution attempt of a Job at a specific time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRun {
    pub index: usize,
    pub scheduled_time: DateTime<Utc>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: RunStatus,
    pub task_runs: Vec<TaskRun>,
}

impl JobRun {
    pub fn recompute_status(&mut self) {
        self.status = derive_job_run_status(self.task_runs.iter().map(|t| &t.status));
    }

    pub fn task_run_mut(&mut self, index: usize) -> Option<&mut TaskRun> {
        self.task_runs.get_mut(index)
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
