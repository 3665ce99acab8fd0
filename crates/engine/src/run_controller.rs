// SPDX-License-Identifier: MIT

//! Implements `runNow`/`toggleOnOff`/`cancel*`/`restart*` against the
//! [`JobRegistry`], and the `updateJobRunStatusFromTasks` derivation that
//! keeps a JobRun's status consistent with its TaskRuns.

use std::sync::Arc;

use dropjob_core::{Clock, CronClock, Event, JobId, RunStatus};

use crate::error::RuntimeError;
use crate::event_bus::EventBus;
use crate::executor::Executor;
use crate::registry::JobRegistry;

pub struct RunController<C: Clock> {
    registry: Arc<JobRegistry>,
    bus: Arc<EventBus>,
    cron: Arc<dyn CronClock>,
    clock: C,
    executor: Arc<Executor<C>>,
}

impl<C: Clock + Clone> RunController<C> {
    pub fn new(registry: Arc<JobRegistry>, bus: Arc<EventBus>, cron: Arc<dyn CronClock>, clock: C, executor: Arc<Executor<C>>) -> Self {
        Self { registry, bus, cron, clock, executor }
    }

    /// Create a manual JobRun (scheduled-time = now) and dispatch it,
    /// independent of the job's OnOff gate.
    pub fn run_now(&self, job_id: JobId) -> Result<usize, RuntimeError> {
        let entry = self.registry.get(job_id).ok_or(RuntimeError::UnknownJob(job_id.get()))?;
        let run_index = {
            let mut job = entry.job.lock();
            self.executor.init_run(&mut job, self.clock.now())
        };
        self.executor.spawn_run(Arc::clone(&self.registry), job_id, run_index);
        Ok(run_index)
    }

    /// Flip the OnOff gate. Turning on recomputes `next_scheduled` from
    /// the cron provider; turning off clears it.
    pub fn toggle_on_off(&self, job_id: JobId) -> Result<bool, RuntimeError> {
        let entry = self.registry.get(job_id).ok_or(RuntimeError::UnknownJob(job_id.get()))?;
        let mut job = entry.job.lock();
        job.on_off = !job.on_off;
        job.next_scheduled = if job.on_off && job.has_cron() {
            self.cron.next_after(&job.cron, self.clock.now())
        } else {
            None
        };
        Ok(job.on_off)
    }

    /// Cancel every Running TaskRun in a JobRun and stop any groups not
    /// yet started. Idempotent: a JobRun with nothing Running is a no-op
    /// beyond the status recompute.
    pub fn cancel_job_run(&self, job_id: JobId, run_index: usize) -> Result<(), RuntimeError> {
        let entry = self.registry.get(job_id).ok_or(RuntimeError::UnknownJob(job_id.get()))?;
        {
            let mut job = entry.job.lock();
            let run = job
                .history
                .get_mut(run_index)
                .ok_or(RuntimeError::UnknownRun { job: job_id.get(), run: run_index })?;
            for task_run in run.task_runs.iter_mut() {
                if task_run.status == RunStatus::Running {
                    task_run.status = RunStatus::Failure;
                    task_run.end_time = None;
                    task_run.log_path.clear();
                }
            }
            run.end_time = None;
            run.recompute_status();
        }
        // Cancelling the run-level token cascades to every TaskRun's
        // child token, including ones for tasks in the group currently
        // in flight; groups not yet started never get a token at all.
        if let Some(token) = entry.active_runs.lock().remove(&run_index) {
            token.cancel();
        }
        self.bus.publish(Event::JobCancel { job_id, run_index });
        Ok(())
    }

    /// Cancel a single TaskRun. A no-op if it isn't Running.
    pub fn cancel_task_run(&self, job_id: JobId, run_index: usize, task_index: usize) -> Result<(), RuntimeError> {
        let entry = self.registry.get(job_id).ok_or(RuntimeError::UnknownJob(job_id.get()))?;
        let cancelled = {
            let mut job = entry.job.lock();
            let run = job
                .history
                .get_mut(run_index)
                .ok_or(RuntimeError::UnknownRun { job: job_id.get(), run: run_index })?;
            let task_run = run
                .task_run_mut(task_index)
                .ok_or(RuntimeError::UnknownTask { job: job_id.get(), run: run_index, task: task_index })?;
            if task_run.status != RunStatus::Running {
                false
            } else {
                task_run.status = RunStatus::Failure;
                task_run.end_time = None;
                task_run.log_path.clear();
                run.recompute_status();
                true
            }
        };
        if !cancelled {
            return Ok(());
        }
        if let Some(token) = entry.active_tasks.lock().remove(&(run_index, task_index)) {
            token.cancel();
        }
        self.bus.publish(Event::TaskCancel { job_id, run_index, task_index });
        Ok(())
    }

    /// Reset a JobRun and all its TaskRuns to baseline, then dispatch the
    /// Executor on the same run index, reusing the original
    /// scheduled-time.
    pub fn restart_job_run(&self, job_id: JobId, run_index: usize) -> Result<(), RuntimeError> {
        let entry = self.registry.get(job_id).ok_or(RuntimeError::UnknownJob(job_id.get()))?;
        {
            let mut job = entry.job.lock();
            let run = job
                .history
                .get_mut(run_index)
                .ok_or(RuntimeError::UnknownRun { job: job_id.get(), run: run_index })?;
            run.status = RunStatus::NoRun;
            run.start_time = None;
            run.end_time = None;
            for task_run in run.task_runs.iter_mut() {
                task_run.reset_to_baseline();
            }
        }
        self.executor.spawn_run(Arc::clone(&self.registry), job_id, run_index);
        Ok(())
    }

    /// Run a single TaskRun in isolation (no JobRun re-execution), then
    /// recompute the JobRun's status.
    pub async fn restart_task_run(&self, job_id: JobId, run_index: usize, task_index: usize) -> Result<(), RuntimeError> {
        let entry = self.registry.get(job_id).ok_or(RuntimeError::UnknownJob(job_id.get()))?;
        {
            let mut job = entry.job.lock();
            let run = job
                .history
                .get_mut(run_index)
                .ok_or(RuntimeError::UnknownRun { job: job_id.get(), run: run_index })?;
            let task_run = run
                .task_run_mut(task_index)
                .ok_or(RuntimeError::UnknownTask { job: job_id.get(), run: run_index, task: task_index })?;
            task_run.reset_to_baseline();
        }
        let task_token = tokio_util::sync::CancellationToken::new();
        entry.active_tasks.lock().insert((run_index, task_index), task_token.clone());
        self.executor.run_task(&entry, job_id, run_index, task_index, task_token).await;

        let mut job = entry.job.lock();
        if let Some(run) = job.history.get_mut(run_index) {
            run.recompute_status();
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "run_controller_tests.rs"]
mod tests;
