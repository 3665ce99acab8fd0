// SPDX-License-Identifier: MIT

//! Owns the live set of Jobs, keyed by stable numeric [`JobId`]. Each Job
//! is guarded by its own lock so that unrelated jobs never contend; the
//! map itself is guarded by a `RwLock` so readers (HTTP snapshot, the
//! scheduler's tick loop) don't block each other.

use std::collections::HashMap;
use std::sync::Arc;

use dropjob_core::{Job, JobId, JobIdGen};
use parking_lot::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

/// A registered job plus the cancellation scopes covering any JobRuns (and
/// their individual TaskRuns) currently in flight for it.
///
/// Task-level tokens are children of their JobRun's token (see
/// [`tokio_util::sync::CancellationToken::child_token`]): cancelling a
/// JobRun's token cascades to every TaskRun running under it, so the
/// Reconciler only has to cancel the run-level tokens to kill everything.
pub struct Entry {
    pub job: Mutex<Job>,
    pub active_runs: Mutex<HashMap<usize, CancellationToken>>,
    pub active_tasks: Mutex<HashMap<(usize, usize), CancellationToken>>,
}

impl Entry {
    pub fn new(job: Job) -> Self {
        Self {
            job: Mutex::new(job),
            active_runs: Mutex::new(HashMap::new()),
            active_tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Cancel every in-flight JobRun (and its TaskRuns) owned by this
    /// entry. Used by the Reconciler before a changed or removed job file
    /// is retired.
    pub fn cancel_all_runs(&self) {
        for (_, token) in self.active_tasks.lock().drain() {
            token.cancel();
        }
        for (_, token) in self.active_runs.lock().drain() {
            token.cancel();
        }
    }
}

#[derive(Default)]
pub struct JobRegistry {
    jobs: RwLock<HashMap<JobId, Arc<Entry>>>,
    ids: JobIdGen,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a fresh Id and register `job`, overwriting `job.id`.
    pub fn insert(&self, mut job: Job) -> JobId {
        let id = self.ids.next();
        job.id = id;
        self.jobs.write().insert(id, Arc::new(Entry::new(job)));
        id
    }

    pub fn remove(&self, id: JobId) -> Option<Arc<Entry>> {
        self.jobs.write().remove(&id)
    }

    pub fn get(&self, id: JobId) -> Option<Arc<Entry>> {
        self.jobs.read().get(&id).cloned()
    }

    /// Snapshot of every registered entry, for iteration without holding
    /// the map lock across per-job work.
    pub fn entries(&self) -> Vec<Arc<Entry>> {
        self.jobs.read().values().cloned().collect()
    }

    pub fn ids(&self) -> Vec<JobId> {
        self.jobs.read().keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.jobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
