// SPDX-License-Identifier: MIT

//! Brings the [`JobRegistry`] into agreement with the on-disk job files.
//! Single-threaded and serialized: a [`Reconciler`] is driven by the
//! directory watcher and by startup, never concurrently with itself.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dropjob_core::{CronClock, Event};
use dropjob_jobfile::loader::{LoadOutcome, Loader};
use dropjob_jobfile::discover_job_files;
use parking_lot::Mutex;

use crate::event_bus::EventBus;
use crate::registry::JobRegistry;

/// Parsing errors recorded by the most recent reconcile, readable by the
/// HTTP `/parsingerrors` handler.
#[derive(Default)]
pub struct ParsingErrors {
    lines: Mutex<Vec<String>>,
}

impl ParsingErrors {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&self, lines: Vec<String>) {
        *self.lines.lock() = lines;
    }

    pub fn snapshot(&self) -> String {
        self.lines.lock().join("\n")
    }
}

pub struct Reconciler {
    jobs_dir: PathBuf,
    registry: Arc<JobRegistry>,
    bus: Arc<EventBus>,
    cron: Arc<dyn CronClock>,
    parsing_errors: Arc<ParsingErrors>,
    loader: Loader,
}

impl Reconciler {
    pub fn new(
        jobs_dir: PathBuf,
        registry: Arc<JobRegistry>,
        bus: Arc<EventBus>,
        cron: Arc<dyn CronClock>,
        parsing_errors: Arc<ParsingErrors>,
    ) -> Self {
        Self {
            jobs_dir,
            registry,
            bus,
            cron,
            parsing_errors,
            loader: Loader::new(),
        }
    }

    /// Full rescan-and-reconcile, per the directory-walk / hash-diff /
    /// retire / load procedure.
    pub fn reconcile(&self) {
        let paths = discover_job_files(&self.jobs_dir).unwrap_or_default();
        let mut scan: HashMap<PathBuf, [u8; 16]> = HashMap::new();
        for path in paths {
            if let Ok(hash) = dropjob_jobfile::source::hash_file(&path) {
                scan.insert(path, hash);
            }
        }

        let mut errors = Vec::new();

        let mut to_remove = Vec::new();
        for id in self.registry.ids() {
            let Some(entry) = self.registry.get(id) else { continue };
            let job = entry.job.lock();
            let path = job.source_path.clone();
            let changed_or_gone = match scan.get(&path) {
                Some(hash) if *hash == job.content_hash => false,
                _ => true,
            };
            drop(job);
            if changed_or_gone {
                to_remove.push(id);
            } else {
                scan.remove(&path);
            }
        }

        for id in to_remove {
            if let Some(entry) = self.registry.remove(id) {
                entry.cancel_all_runs();
            }
        }

        for (path, _hash) in scan {
            match self.loader.load(&path, self.cron.as_ref()) {
                LoadOutcome::Loaded(loaded) => {
                    let job = loaded.into_job(dropjob_core::JobId::new(0));
                    self.registry.insert(job);
                }
                LoadOutcome::Failed { path, error } => {
                    errors.push(format!("{}: {error}", path.display()));
                }
            }
        }

        self.parsing_errors.reset(errors);
        self.bus.publish(Event::JobsUpdated);
    }
}

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;
