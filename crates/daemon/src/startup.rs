// SPDX-License-Identifier: MIT

//! Builds every collaborator (registry, bus, cron provider, reconciler,
//! run controller, scheduler) and wires them together, then runs one
//! full reconcile synchronously before handing control back to `main`:
//! the registry is never empty when the HTTP listener starts accepting,
//! and the watcher only starts running concurrently after that.

use std::sync::Arc;

use dropjob_adapters::cron::CronAdapter;
use dropjob_adapters::notifier::{NoOpNotifier, Notifier, ProgramNotifier};
use dropjob_adapters::watcher::{self, DirectoryWatch, WatchError};
use dropjob_adapters::SigningSecret;
use dropjob_core::{CronClock, SystemClock};
use dropjob_engine::{EventBus, Executor, JobRegistry, ParsingErrors, Reconciler, RunController, Scheduler};

use crate::config::Config;
use crate::state::AppState;

/// Kept alive for the process lifetime; dropping it stops the
/// filesystem watch and the background scheduler/watch-reconcile tasks.
pub struct Startup {
    pub state: AppState,
    _watch: DirectoryWatch,
}

pub fn build(config: Config) -> Result<Startup, WatchError> {
    let registry = Arc::new(JobRegistry::new());
    let bus = Arc::new(EventBus::new());
    let cron: Arc<dyn CronClock> = Arc::new(CronAdapter::new());
    let parsing_errors = Arc::new(ParsingErrors::new());

    let notifier: Arc<dyn Notifier> = match ProgramNotifier::new(config.notify_program.clone()) {
        Some(n) => Arc::new(n),
        None => Arc::new(NoOpNotifier),
    };
    let executor = Arc::new(Executor::new(SystemClock, bus.clone(), notifier, config.logs_dir.clone()));
    let run_controller = Arc::new(RunController::new(registry.clone(), bus.clone(), cron.clone(), SystemClock, executor.clone()));
    let reconciler = Arc::new(Reconciler::new(config.jobs_dir.clone(), registry.clone(), bus.clone(), cron.clone(), parsing_errors.clone()));

    // Reconcile once, synchronously, before accepting any HTTP traffic.
    reconciler.reconcile();

    let (watch, mut changes) = watcher::watch(&config.jobs_dir)?;

    let scheduler = Scheduler::new(registry.clone(), cron.clone(), SystemClock, executor.clone());
    tokio::spawn(async move {
        scheduler.run().await;
    });

    let watched_reconciler = Arc::clone(&reconciler);
    tokio::spawn(async move {
        while changes.recv().await.is_some() {
            watched_reconciler.reconcile();
        }
    });

    let state = AppState {
        config: Arc::new(config),
        registry,
        bus,
        cron,
        parsing_errors,
        reconciler,
        run_controller,
        executor,
        clock: SystemClock,
        signing_secret: Arc::new(SigningSecret::generate()),
    };

    Ok(Startup { state, _watch: watch })
}
