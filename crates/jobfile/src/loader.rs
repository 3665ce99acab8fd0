// SPDX-License-Identifier: MIT

//! Ties source reading, decoding, validation, and cron parsing together
//! into a ready `dropjob_core::Job` template.

use std::path::{Path, PathBuf};

use dropjob_core::job::{Job, Order, Task};
use dropjob_core::CronClock;

use crate::error::LoadError;
use crate::raw::decode;
use crate::source::read;
use crate::validate::{validate, Normalized};

/// Result of loading a single `.job` file. Does not assign a [`dropjob_core::JobId`]
/// or register anything — that's the registry's job once this outcome
/// reaches it.
pub enum LoadOutcome {
    Loaded(LoadedJob),
    Failed { path: PathBuf, error: LoadError },
}

/// A validated job template, not yet registered.
pub struct LoadedJob {
    pub source_path: PathBuf,
    pub content_hash: [u8; 16],
    pub title: String,
    pub cron: String,
    pub schedule_text: String,
    pub tasks: Vec<Task>,
    pub order: Order,
    pub order_provided: bool,
    pub default_retries: u32,
    pub default_task_timeout_secs: u32,
    pub default_emails: Vec<String>,
    pub load_warnings: Vec<String>,
}

impl LoadedJob {
    /// Assign an id and turn this into a registered [`Job`] with empty
    /// history, scheduling disabled until the registry flips it on.
    pub fn into_job(self, id: dropjob_core::JobId) -> Job {
        Job {
            id,
            source_path: self.source_path,
            content_hash: self.content_hash,
            title: self.title,
            cron: self.cron,
            schedule_text: self.schedule_text,
            tasks: self.tasks,
            order: self.order,
            order_provided: self.order_provided,
            default_retries: self.default_retries,
            default_task_timeout_secs: self.default_task_timeout_secs,
            default_emails: self.default_emails,
            on_off: false,
            next_scheduled: None,
            history: Vec::new(),
            load_warnings: self.load_warnings,
        }
    }
}

#[derive(Default)]
pub struct Loader;

impl Loader {
    pub fn new() -> Self {
        Self
    }

    /// Load and validate one `.job` file. A cron expression of `""` means
    /// manual-only and is accepted without consulting `cron`.
    pub fn load(&self, path: &Path, cron: &dyn CronClock) -> LoadOutcome {
        match self.try_load(path, cron) {
            Ok(loaded) => LoadOutcome::Loaded(loaded),
            Err(error) => LoadOutcome::Failed { path: path.to_path_buf(), error },
        }
    }

    fn try_load(&self, path: &Path, cron: &dyn CronClock) -> Result<LoadedJob, LoadError> {
        let source = read(path)?;
        let raw = decode(&source.bytes)?;
        let Normalized {
            title,
            cron: cron_expr,
            tasks,
            order,
            order_provided,
            default_retries,
            default_task_timeout_secs,
            default_emails,
            warnings,
        } = validate(raw)?;

        let schedule_text = if cron_expr.is_empty() {
            "manual only".to_string()
        } else {
            cron.parse(&cron_expr)
                .map_err(|e| LoadError::InvalidCron { expr: cron_expr.clone(), reason: e.0 })?;
            cron.humanize(&cron_expr).unwrap_or_else(|| cron_expr.clone())
        };

        Ok(LoadedJob {
            source_path: path.to_path_buf(),
            content_hash: source.hash,
            title,
            cron: cron_expr,
            schedule_text,
            tasks,
            order,
            order_provided,
            default_retries,
            default_task_timeout_secs,
            default_emails,
            load_warnings: warnings,
        })
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
