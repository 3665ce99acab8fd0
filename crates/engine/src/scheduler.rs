// SPDX-License-Identifier: MIT

//! Drives cron-scheduled dispatch. Ticks once a second, comparing each
//! gated job's `next_scheduled` against the clock and firing the
//! Executor when due — the "fires registered callbacks" half of the
//! Clock/Cron provider's contract, grounded in the same
//! interval-tick/`next_runs` map shape a cron daemon reaches for instead
//! of a timer-wheel per job.

use std::sync::Arc;
use std::time::Duration;

use dropjob_core::{Clock, CronClock};

use crate::executor::Executor;
use crate::registry::JobRegistry;

const TICK: Duration = Duration::from_secs(1);

pub struct Scheduler<C: Clock> {
    registry: Arc<JobRegistry>,
    cron: Arc<dyn CronClock>,
    clock: C,
    executor: Arc<Executor<C>>,
}

impl<C: Clock + Clone> Scheduler<C> {
    pub fn new(registry: Arc<JobRegistry>, cron: Arc<dyn CronClock>, clock: C, executor: Arc<Executor<C>>) -> Self {
        Self { registry, cron, clock, executor }
    }

    /// Run the tick loop forever. Intended to be spawned as its own
    /// task; never returns under normal operation.
    pub async fn run(&self) {
        let mut ticker = tokio::time::interval(TICK);
        loop {
            ticker.tick().await;
            self.tick();
        }
    }

    /// One pass over every registered job: fire and reschedule anything
    /// due. Exposed separately so tests can drive it deterministically
    /// against a `FakeClock` instead of waiting on real wall-clock time.
    pub fn tick(&self) {
        let now = self.clock.now();
        for entry in self.registry.entries() {
            let (job_id, run_index) = {
                let mut job = entry.job.lock();
                if !job.on_off || !job.has_cron() {
                    continue;
                }
                let due = job.next_scheduled.map(|t| t <= now).unwrap_or(false);
                if !due {
                    continue;
                }
                let scheduled_time = job.next_scheduled.unwrap_or(now);
                let cron_expr = job.cron.clone();
                let run_index = self.executor.init_run(&mut job, scheduled_time);
                job.next_scheduled = self.cron.next_after(&cron_expr, now);
                (job.id, run_index)
            };
            self.executor.spawn_run(Arc::clone(&self.registry), job_id, run_index);
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
