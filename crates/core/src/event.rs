// SPDX-License-Identifier: MIT

//! Event bus message shapes. Each variant serializes as a
//! short JSON object `{"event":"<kind>", …fields}`; `kind()` returns the
//! tag so the bus and HTTP layer don't need to re-derive it.

use serde::Serialize;

use crate::id::JobId;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    JobsUpdated,
    JobRunning {
        job_id: JobId,
        run_index: usize,
    },
    JobFinished {
        job_id: JobId,
        run_index: usize,
        status: crate::status::RunStatus,
    },
    JobCancel {
        job_id: JobId,
        run_index: usize,
    },
    TaskRunning {
        job_id: JobId,
        run_index: usize,
        task_index: usize,
    },
    TaskFinished {
        job_id: JobId,
        run_index: usize,
        task_index: usize,
        status: crate::status::RunStatus,
    },
    TaskCancel {
        job_id: JobId,
        run_index: usize,
        task_index: usize,
    },
}

impl Event {
    pub fn kind(&self) -> &'static str {
        match self {
            Event::JobsUpdated => "jobs_updated",
            Event::JobRunning { .. } => "job_running",
            Event::JobFinished { .. } => "job_finished",
            Event::JobCancel { .. } => "job_cancel",
            Event::TaskRunning { .. } => "task_running",
            Event::TaskFinished { .. } => "task_finished",
            Event::TaskCancel { .. } => "task_cancel",
        }
    }

    /// Render as the bus wire format: a single JSON line.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{{\"event\":\"{}\"}}", self.kind()))
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
