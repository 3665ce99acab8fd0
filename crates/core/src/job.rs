// SPDX-License-Identifier: MIT

//! Job and Task templates plus live job state.

use serde::{Deserialize, Serialize};

use crate::id::JobId;
use crate::run::JobRun;

/// One shell command within a job, with its own retry/timeout/email
/// overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub cmd: String,
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(default)]
    pub retries: u32,
    #[serde(default)]
    pub timeout_secs: u32,
}

/// An ordered sequence of parallel groups. Each group is a set of task
/// names; declaration order within a group carries no ordering
/// guarantee among those tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order(pub Vec<Vec<String>>);

impl Order {
    /// Synthesize `[[t1],[t2],…]` preserving declaration order, used when
    /// the job file omits an explicit `order`.
    pub fn singleton_per_task(tasks: &[Task]) -> Self {
        Order(tasks.iter().map(|t| vec![t.name.clone()]).collect())
    }

    pub fn groups(&self) -> impl Iterator<Item = &[String]> {
        self.0.iter().map(|g| g.as_slice())
    }

    /// Flattened task names in execution position order.
    pub fn flattened(&self) -> impl Iterator<Item = &str> {
        self.0.iter().flat_map(|g| g.iter().map(|s| s.as_str()))
    }
}

/// A scheduled unit loaded from a single file; owns its tasks and the
/// history of runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub source_path: std::path::PathBuf,
    /// 16-byte content digest of the source file at last load.
    pub content_hash: [u8; 16],
    pub title: String,
    pub cron: String,
    pub schedule_text: String,
    pub tasks: Vec<Task>,
    pub order: Order,
    pub order_provided: bool,
    pub default_retries: u32,
    pub default_task_timeout_secs: u32,
    pub default_emails: Vec<String>,
    pub on_off: bool,
    #[serde(default)]
    pub next_scheduled: Option<chrono::DateTime<chrono::Utc>>,
    pub history: Vec<JobRun>,
    /// Warnings recorded while loading this job (e.g. coerced negatives).
    #[serde(default)]
    pub load_warnings: Vec<String>,
}

impl Job {
    pub fn task(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.name == name)
    }

    /// Resolve the effective retries/timeout/emails for a task, applying
    /// the task-overrides-job rule: a nonzero/non-empty task-level value
    /// wins, otherwise the job-level default applies.
    pub fn resolve_task_defaults(&self, task: &Task) -> (u32, u32, Vec<String>) {
        let retries = if task.retries != 0 {
            task.retries
        } else {
            self.default_retries
        };
        let timeout = if task.timeout_secs != 0 {
            task.timeout_secs
        } else {
            self.default_task_timeout_secs
        };
        let emails = if !task.emails.is_empty() {
            task.emails.clone()
        } else {
            self.default_emails.clone()
        };
        (retries, timeout, emails)
    }

    pub fn has_cron(&self) -> bool {
        !self.cron.is_empty()
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
