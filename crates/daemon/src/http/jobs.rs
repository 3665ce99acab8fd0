// SPDX-License-Identifier: MIT

//! `/jobs`, `/lastoutput`, `/parsingerrors`: read-only snapshot handlers.

use axum::extract::{Query, State};
use axum::Json;
use dropjob_core::{Job, JobId};
use serde::Deserialize;

use crate::error::HttpError;
use crate::state::AppState;

/// Full snapshot of every registered job, for the `/jobs` handler. Reads
/// under each job's own lock rather than the registry map lock, so a
/// snapshot never blocks the Reconciler or Executor for longer than one
/// job's worth of copying.
pub async fn snapshot(State(state): State<AppState>) -> Json<Vec<Job>> {
    let jobs: Vec<Job> = state.registry.entries().iter().map(|entry| entry.job.lock().clone()).collect();
    Json(jobs)
}

pub async fn parsing_errors(State(state): State<AppState>) -> String {
    state.parsing_errors.snapshot()
}

#[derive(Debug, Deserialize)]
pub struct LastOutputQuery {
    pub job: u64,
    pub run: usize,
    pub task: usize,
}

/// Return the captured stdout+stderr for one TaskRun. Read from the
/// in-memory `output` field rather than the disk log so this works even
/// when `REPEATER_LOGS_DIRECTORY` is unset.
pub async fn last_output(State(state): State<AppState>, Query(q): Query<LastOutputQuery>) -> Result<String, HttpError> {
    let entry = state.registry.get(JobId::new(q.job)).ok_or(HttpError::NotFound)?;
    let job = entry.job.lock();
    let run = job.history.get(q.run).ok_or(HttpError::NotFound)?;
    let task_run = run.task_runs.get(q.task).ok_or(HttpError::NotFound)?;
    Ok(task_run.output.clone())
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
