// SPDX-License-Identifier: MIT

//! Builders used by this crate's own tests and re-used by
//! `dropjob-jobfile`/`dropjob-engine` test modules (feature `test-support`).

use std::path::PathBuf;

use crate::id::JobId;
use crate::job::{Job, Order, Task};
use crate::run::TaskRun;
use crate::status::RunStatus;

pub fn task(name: &str, cmd: &str) -> Task {
    Task {
        name: name.to_string(),
        cmd: cmd.to_string(),
        emails: Vec::new(),
        retries: 0,
        timeout_secs: 0,
    }
}

pub fn task_run(index: usize, name: &str, status: RunStatus) -> TaskRun {
    let mut tr = TaskRun::new_baseline(index, name.to_string(), format!("echo {name}"), 0, 0, vec![]);
    tr.status = status;
    tr
}

/// Minimal job builder for unit tests: one task named after `title`,
/// empty cron (manual-only), order synthesized.
pub struct JobBuilder {
    title: String,
}

impl JobBuilder {
    pub fn build(self) -> Job {
        let tasks = vec![task(&self.title, "echo hi")];
        let order = Order::singleton_per_task(&tasks);
        Job {
            id: JobId::new(0),
            source_path: PathBuf::from(format!("{}.job", self.title)),
            content_hash: [0; 16],
            title: self.title,
            cron: String::new(),
            schedule_text: String::new(),
            tasks,
            order,
            order_provided: false,
            default_retries: 0,
            default_task_timeout_secs: 0,
            default_emails: Vec::new(),
            on_off: false,
            next_scheduled: None,
            history: Vec::new(),
            load_warnings: Vec::new(),
        }
    }
}

pub fn job_builder(title: &str) -> JobBuilder {
    JobBuilder {
        title: title.to_string(),
    }
}
