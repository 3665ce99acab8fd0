// SPDX-License-Identifier: MIT

//! Narrow collaborator contract for the cron-expression provider. The
//! concrete implementation lives in `dropjob-adapters::cron`; this crate
//! only names the shape so the Loader and the Reconciler/Scheduler can
//! depend on a trait object instead of a concrete crate or ambient
//! singleton.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid cron expression: {0}")]
pub struct CronParseError(pub String);

pub trait CronClock: Send + Sync {
    /// Validate (and internally cache/compile) a cron expression. Empty
    /// expressions are never passed here — an empty cron means
    /// "manual-only" and callers must special-case it before calling.
    fn parse(&self, expr: &str) -> Result<(), CronParseError>;

    /// Best-effort humanization; `None` when the expression doesn't fit a
    /// known shape, in which case callers fall back to the raw text.
    fn humanize(&self, expr: &str) -> Option<String>;

    /// Next fire time strictly after `after`.
    fn next_after(&self, expr: &str, after: DateTime<Utc>) -> Option<DateTime<Utc>>;
}
