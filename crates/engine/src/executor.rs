// SPDX-License-Identifier: MIT

//! Runs a JobRun: iterates its ordered parallel groups and, per task,
//! handles template rendering, spawn, wait, timeout, cancel, retry,
//! output capture, log persistence, and notification-on-failure.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dropjob_adapters::notifier::{Notifier, NotifyRequest};
use dropjob_core::{Clock, Event, Job, JobId, JobRun, RunStatus, TaskRun};
use dropjob_jobfile::template::render;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::event_bus::EventBus;
use crate::registry::{Entry, JobRegistry};

/// Replace any rune outside `[A-Za-z0-9_-]` with `_`.
pub fn sanitize_filename_component(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect()
}

/// Runs JobRuns and TaskRuns. Shared across the Scheduler's cron-tick
/// dispatch, `runNow`, and `restartJobRun`/`restartTaskRun` so every
/// execution path goes through the same spawn/timeout/retry/notify
/// sequence.
pub struct Executor<C: Clock> {
    clock: C,
    bus: Arc<EventBus>,
    notifier: Arc<dyn Notifier>,
    logs_dir: Option<PathBuf>,
}

impl<C: Clock> Executor<C> {
    pub fn new(clock: C, bus: Arc<EventBus>, notifier: Arc<dyn Notifier>, logs_dir: Option<PathBuf>) -> Self {
        Self { clock, bus, notifier, logs_dir }
    }

    /// Create a new JobRun on `job`, flattening `job.order` into TaskRuns
    /// in execution position order, and append it to history. Returns the
    /// new run's index. Does not start execution.
    pub fn init_run(&self, job: &mut Job, scheduled_time: DateTime<Utc>) -> usize {
        let index = job.history.len();
        let mut task_runs = Vec::new();
        let mut task_index = 0usize;
        for name in job.order.flattened() {
            let Some(task) = job.task(name) else { continue };
            let (retries, timeout_secs, emails) = job.resolve_task_defaults(task);
            task_runs.push(TaskRun::new_baseline(
                task_index,
                task.name.clone(),
                task.cmd.clone(),
                retries,
                timeout_secs,
                emails,
            ));
            task_index += 1;
        }
        job.history.push(JobRun {
            index,
            scheduled_time,
            start_time: None,
            end_time: None,
            status: RunStatus::NoRun,
            task_runs,
        });
        index
    }

    /// Spawn `run_job` in the background and return immediately; used so
    /// the scheduler's tick loop and HTTP handlers never block on a run's
    /// completion.
    pub fn spawn_run(self: &Arc<Self>, registry: Arc<JobRegistry>, job_id: JobId, run_index: usize)
    where
        C: Clone,
    {
        let executor = Arc::clone(self);
        tokio::spawn(async move {
            executor.run_job(&registry, job_id, run_index).await;
        });
    }

    /// Run every parallel group of `run_index` in order, waiting for each
    /// group to fully terminate before starting the next. Always returns
    /// cleanly so a panicking/failing job never stops the scheduler.
    pub async fn run_job(&self, registry: &JobRegistry, job_id: JobId, run_index: usize) {
        let Some(entry) = registry.get(job_id) else { return };

        let group_sizes: Vec<usize> = {
            let job = entry.job.lock();
            job.order.0.iter().map(|g| g.len()).collect()
        };

        let run_token = CancellationToken::new();
        entry.active_runs.lock().insert(run_index, run_token.clone());

        {
            let mut job = entry.job.lock();
            if let Some(run) = job.history.get_mut(run_index) {
                run.status = RunStatus::Running;
                run.start_time = Some(self.clock.now());
            }
        }
        self.bus.publish(Event::JobRunning { job_id, run_index });

        let mut start = 0usize;
        for size in group_sizes {
            if run_token.is_cancelled() {
                break;
            }
            let indices: Vec<usize> = (start..start + size).collect();
            start += size;

            let mut handles = Vec::with_capacity(indices.len());
            for task_index in indices {
                let task_token = run_token.child_token();
                entry.active_tasks.lock().insert((run_index, task_index), task_token.clone());
                handles.push(self.run_task(&entry, job_id, run_index, task_index, task_token));
            }
            futures_util::future::join_all(handles).await;

            if run_token.is_cancelled() {
                break;
            }

            let group_failed = {
                let job = entry.job.lock();
                job.history
                    .get(run_index)
                    .map(|run| indices_failed(run, start - size, start))
                    .unwrap_or(false)
            };
            if group_failed {
                break;
            }
        }

        entry.active_runs.lock().remove(&run_index);

        if run_token.is_cancelled() {
            // The RunController already stamped status/end-time and
            // published `job_cancel`; a cancelled run never gets
            // `job_finished` too.
            return;
        }

        let final_status = {
            let mut job = entry.job.lock();
            let Some(run) = job.history.get_mut(run_index) else {
                return;
            };
            run.end_time = Some(self.clock.now());
            run.recompute_status();
            run.status
        };
        self.bus.publish(Event::JobFinished { job_id, run_index, status: final_status });
    }

    /// Run a single TaskRun to completion, including retries. Returns
    /// once the task is terminal (Success, or Failure with retries
    /// exhausted or cancelled).
    #[allow(clippy::too_many_arguments)]
    pub(crate) async fn run_task(
        &self,
        entry: &Arc<Entry>,
        job_id: JobId,
        run_index: usize,
        task_index: usize,
        task_token: CancellationToken,
    ) {
        let (job_title, command_template, retries, timeout_secs, emails, scheduled_time) = {
            let job = entry.job.lock();
            let Some(run) = job.history.get(run_index) else { return };
            let Some(task_run) = run.task_runs.get(task_index) else { return };
            (
                job.title.clone(),
                task_run.command_template.clone(),
                task_run.retries,
                task_run.timeout_secs,
                task_run.emails.clone(),
                run.scheduled_time,
            )
        };

        let mut params = HashMap::new();
        params.insert("title", job_title.clone());
        params.insert("scheduled_dt", scheduled_time.format("%Y-%m-%d").to_string());

        let rendered = match render(&command_template, &params) {
            Ok(r) => r,
            Err(err) => {
                let mut job = entry.job.lock();
                if let Some(run) = job.history.get_mut(run_index) {
                    if let Some(task_run) = run.task_run_mut(task_index) {
                        task_run.status = RunStatus::Failure;
                        task_run.end_time = Some(self.clock.now());
                        task_run.output = format!("ERROR: template error: {err}");
                    }
                    run.recompute_status();
                }
                drop(job);
                entry.active_tasks.lock().remove(&(run_index, task_index));
                self.bus.publish(Event::TaskFinished { job_id, run_index, task_index, status: RunStatus::Failure });
                return;
            }
        };

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let start_time = self.clock.now();
            {
                let mut job = entry.job.lock();
                if let Some(run) = job.history.get_mut(run_index) {
                    if let Some(task_run) = run.task_run_mut(task_index) {
                        task_run.rendered_command = rendered.clone();
                        task_run.status = RunStatus::Running;
                        task_run.start_time = Some(start_time);
                        task_run.end_time = None;
                        task_run.attempt = attempt;
                    }
                }
            }
            self.bus.publish(Event::TaskRunning { job_id, run_index, task_index });

            let outcome = self.spawn_and_wait(&rendered, timeout_secs, &task_token).await;

            if matches!(outcome, TaskOutcome::Cancelled) {
                // The RunController (or Reconciler retiring the job) already
                // wrote the terminal state and emitted task_cancel/job_cancel
                // when it cancelled this token; nothing left to record.
                entry.active_tasks.lock().remove(&(run_index, task_index));
                return;
            }

            let end_time = self.clock.now();
            let (status, mut output, notify, failure_reason) = match outcome {
                TaskOutcome::Exited { success, output } if success => (RunStatus::Success, output, false, None),
                TaskOutcome::Exited { output, .. } => (RunStatus::Failure, output, true, Some("non-zero exit")),
                TaskOutcome::TimedOut { output } => (RunStatus::Failure, output, true, Some("timed out")),
                TaskOutcome::Cancelled => unreachable!(),
            };
            if let Some(reason) = failure_reason {
                output.push_str(&format!("\nERROR: task {reason}\n"));
            }

            let log_path = self.persist_log(&job_title, &rendered_task_name(entry, run_index, task_index), start_time, &output);

            {
                let mut job = entry.job.lock();
                if let Some(run) = job.history.get_mut(run_index) {
                    if let Some(task_run) = run.task_run_mut(task_index) {
                        task_run.status = status;
                        task_run.end_time = Some(end_time);
                        task_run.output = output.clone();
                        task_run.log_path = log_path.unwrap_or_default();
                    }
                    run.recompute_status();
                }
            }
            self.bus.publish(Event::TaskFinished { job_id, run_index, task_index, status });

            if notify {
                self.notifier
                    .notify(NotifyRequest {
                        job_title: &job_title,
                        task_name: &rendered_task_name(entry, run_index, task_index),
                        start: start_time,
                        end: end_time,
                        emails: &emails,
                    })
                    .await;
            }

            if status == RunStatus::Success || attempt > retries {
                entry.active_tasks.lock().remove(&(run_index, task_index));
                return;
            }
            // retry: loop back around with the same TaskRun, a fresh
            // start-time, and a cleared rendered command/log.
        }
    }

    async fn spawn_and_wait(&self, rendered: &str, timeout_secs: u32, task_token: &CancellationToken) -> TaskOutcome {
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(rendered)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .process_group(0)
            .kill_on_drop(true);

        let mut child = match cmd.spawn() {
            Ok(c) => c,
            Err(err) => return TaskOutcome::Exited { success: false, output: format!("ERROR: failed to spawn: {err}") },
        };
        let pid = child.id().map(|p| p as i32);

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        // Drain both pipes on their own task, started immediately and
        // running concurrently with the wait below — a child that writes
        // more than one pipe buffer would otherwise block on `write()`
        // forever, since nothing would be reading until after `wait()`
        // resolved, and `wait()` never resolves until the child stops
        // writing. `JoinHandle` is `Send + 'static`, so every `select!`
        // arm below can await it without re-borrowing `child`.
        let collect: tokio::task::JoinHandle<(Vec<u8>, Vec<u8>)> = tokio::spawn(async move {
            let mut out_buf = Vec::new();
            let mut err_buf = Vec::new();
            if let Some(mut s) = stdout {
                let _ = s.read_to_end(&mut out_buf).await;
            }
            if let Some(mut s) = stderr {
                let _ = s.read_to_end(&mut err_buf).await;
            }
            (out_buf, err_buf)
        });

        let timeout_fut: std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send>> = if timeout_secs > 0 {
            Box::pin(tokio::time::sleep(std::time::Duration::from_secs(timeout_secs as u64)))
        } else {
            Box::pin(futures_util::future::pending())
        };
        tokio::pin!(timeout_fut);

        let wait_fut = child.wait();
        tokio::pin!(wait_fut);

        tokio::select! {
            biased;
            _ = task_token.cancelled() => {
                kill_process_group(pid);
                let _ = wait_fut.await;
                let _ = collect.await;
                TaskOutcome::Cancelled
            }
            _ = &mut timeout_fut => {
                kill_process_group(pid);
                let _ = wait_fut.await;
                let (out, err) = collect.await.unwrap_or_default();
                TaskOutcome::TimedOut { output: combine_output(out, err) }
            }
            status = &mut wait_fut => {
                let (out, err) = collect.await.unwrap_or_default();
                let success = status.map(|s| s.success()).unwrap_or(false);
                TaskOutcome::Exited { success, output: combine_output(out, err) }
            }
        }
    }

    /// Persist output to `<start>_<title>_<taskname>.log` in the logs
    /// directory, if configured. Write failures are logged but never fail
    /// the TaskRun.
    fn persist_log(&self, title: &str, task_name: &str, start: DateTime<Utc>, output: &str) -> Option<String> {
        let dir = self.logs_dir.as_ref()?;
        if let Err(err) = std::fs::create_dir_all(dir) {
            tracing::warn!(error = %err, "failed to create logs directory");
            return None;
        }
        let filename = format!(
            "{}_{}_{}.log",
            start.format("%Y%m%dT%H%M%S"),
            sanitize_filename_component(title),
            sanitize_filename_component(task_name)
        );
        let path = dir.join(&filename);
        match std::fs::write(&path, output) {
            Ok(()) => Some(path.to_string_lossy().into_owned()),
            Err(err) => {
                tracing::warn!(error = %err, path = %path.display(), "failed to persist task log");
                None
            }
        }
    }
}

fn rendered_task_name(entry: &Arc<Entry>, run_index: usize, task_index: usize) -> String {
    entry
        .job
        .lock()
        .history
        .get(run_index)
        .and_then(|r| r.task_runs.get(task_index))
        .map(|t| t.task_name.clone())
        .unwrap_or_default()
}

fn indices_failed(run: &JobRun, start: usize, end: usize) -> bool {
    run.task_runs[start..end].iter().any(|t| t.status == RunStatus::Failure)
}

enum TaskOutcome {
    Exited { success: bool, output: String },
    TimedOut { output: String },
    Cancelled,
}

fn combine_output(stdout: Vec<u8>, stderr: Vec<u8>) -> String {
    let mut out = String::from_utf8_lossy(&stdout).into_owned();
    if !stderr.is_empty() {
        out.push_str(&String::from_utf8_lossy(&stderr));
    }
    out
}

fn kill_process_group(pid: Option<i32>) {
    let Some(pid) = pid else { return };
    // `process_group(0)` makes the child its own group leader, so a
    // negative pid targets the whole group including any shell children.
    let _ = kill(Pid::from_raw(-pid), Signal::SIGTERM);
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
