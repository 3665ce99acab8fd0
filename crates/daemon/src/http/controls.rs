// SPDX-License-Identifier: MIT

//! `/onoff`, `/runnow`, `/restart`, `/cancel`: the Run Controller's HTTP
//! face. All four take a `job=<id>` query parameter; restart/cancel also
//! take `run=<i>` and an optional `task=<j>`.

use axum::extract::{Query, State};
use axum::Json;
use dropjob_core::JobId;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::HttpError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct JobQuery {
    pub job: u64,
}

pub async fn onoff(State(state): State<AppState>, Query(q): Query<JobQuery>) -> Result<Json<Value>, HttpError> {
    let on = state.run_controller.toggle_on_off(JobId::new(q.job))?;
    Ok(Json(json!({ "on_off": on })))
}

pub async fn run_now(State(state): State<AppState>, Query(q): Query<JobQuery>) -> Result<Json<Value>, HttpError> {
    let run_index = state.run_controller.run_now(JobId::new(q.job))?;
    Ok(Json(json!({ "run": run_index })))
}

#[derive(Debug, Deserialize)]
pub struct RunOrTaskQuery {
    pub job: u64,
    pub run: usize,
    pub task: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct Ack {
    pub ok: bool,
}

pub async fn restart(State(state): State<AppState>, Query(q): Query<RunOrTaskQuery>) -> Result<Json<Ack>, HttpError> {
    let job_id = JobId::new(q.job);
    match q.task {
        Some(task_index) => state.run_controller.restart_task_run(job_id, q.run, task_index).await?,
        None => state.run_controller.restart_job_run(job_id, q.run)?,
    }
    Ok(Json(Ack { ok: true }))
}

pub async fn cancel(State(state): State<AppState>, Query(q): Query<RunOrTaskQuery>) -> Result<Json<Ack>, HttpError> {
    let job_id = JobId::new(q.job);
    match q.task {
        Some(task_index) => state.run_controller.cancel_task_run(job_id, q.run, task_index)?,
        None => state.run_controller.cancel_job_run(job_id, q.run)?,
    }
    Ok(Json(Ack { ok: true }))
}

#[cfg(test)]
#[path = "controls_tests.rs"]
mod tests;
