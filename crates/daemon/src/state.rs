// SPDX-License-Identifier: MIT

//! Shared application state handed to every axum handler. Registry, bus,
//! and cron provider are built first; the reconciler and run controller
//! are built from them; nothing here is an ambient singleton except the
//! signing secret, which is explicitly allowed to be process-wide.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dropjob_adapters::SigningSecret;
use dropjob_core::{Clock, CronClock, SystemClock};
use dropjob_engine::{EventBus, Executor, JobRegistry, ParsingErrors, Reconciler, RunController};

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<JobRegistry>,
    pub bus: Arc<EventBus>,
    pub cron: Arc<dyn CronClock>,
    pub parsing_errors: Arc<ParsingErrors>,
    pub reconciler: Arc<Reconciler>,
    pub run_controller: Arc<RunController<SystemClock>>,
    pub executor: Arc<Executor<SystemClock>>,
    pub clock: SystemClock,
    pub signing_secret: Arc<SigningSecret>,
}

impl AppState {
    pub fn clock_now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}
