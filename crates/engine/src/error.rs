// SPDX-License-Identifier: MIT

//! Error taxonomy for the scheduling/execution engine. Mirrors
//! `dropjob-jobfile::LoadError` in shape: concrete enums per concern, no
//! `anyhow`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("unknown job id {0}")]
    UnknownJob(u64),
    #[error("job {job} has no run at index {run}")]
    UnknownRun { job: u64, run: usize },
    #[error("job {job} run {run} has no task at index {task}")]
    UnknownTask { job: u64, run: usize, task: usize },
}
