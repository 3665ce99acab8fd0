// SPDX-License-Identifier: MIT

//! Stable numeric job identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Unique, stable identifier for a registered [`crate::Job`].
///
/// Assigned once by the registry when a job-file is loaded and never
/// reused for the lifetime of the process, even if the job is later
/// retired — a fresh reload of a changed file always gets a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl JobId {
    pub fn new(n: u64) -> Self {
        Self(n)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic generator for [`JobId`]s, shared by the registry.
#[derive(Debug, Default)]
pub struct JobIdGen(AtomicU64);

impl JobIdGen {
    pub fn new() -> Self {
        Self(AtomicU64::new(1))
    }

    /// Returns the next id and advances the counter.
    pub fn next(&self) -> JobId {
        JobId(self.0.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
