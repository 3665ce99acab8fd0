// SPDX-License-Identifier: MIT

//! Fixtures shared by this crate's handler tests.

use std::path::PathBuf;
use std::sync::Arc;

use dropjob_adapters::cron::CronAdapter;
use dropjob_adapters::notifier::NoOpNotifier;
use dropjob_adapters::SigningSecret;
use dropjob_core::{CronClock, SystemClock};
use dropjob_engine::{EventBus, Executor, JobRegistry, ParsingErrors, Reconciler, RunController};

use crate::config::Config;
use crate::state::AppState;

pub fn config(password: &str) -> Config {
    Config {
        addr: "127.0.0.1:0".parse().expect("valid"),
        jobs_dir: PathBuf::from("./jobs"),
        password: password.to_string(),
        notify_program: String::new(),
        logs_dir: None,
    }
}

pub fn state_with_password(password: &str) -> AppState {
    let registry = Arc::new(JobRegistry::new());
    let bus = Arc::new(EventBus::new());
    let cron: Arc<dyn CronClock> = Arc::new(CronAdapter::new());
    let parsing_errors = Arc::new(ParsingErrors::new());
    let executor = Arc::new(Executor::new(SystemClock, bus.clone(), Arc::new(NoOpNotifier), None));
    let run_controller = Arc::new(RunController::new(registry.clone(), bus.clone(), cron.clone(), SystemClock, executor.clone()));
    let cfg = config(password);
    let reconciler = Arc::new(Reconciler::new(cfg.jobs_dir.clone(), registry.clone(), bus.clone(), cron.clone(), parsing_errors.clone()));

    AppState {
        config: Arc::new(cfg),
        registry,
        bus,
        cron,
        parsing_errors,
        reconciler,
        run_controller,
        executor,
        clock: SystemClock,
        signing_secret: Arc::new(SigningSecret::from_bytes(vec![7u8; 32])),
    }
}

pub fn state() -> AppState {
    state_with_password("")
}
