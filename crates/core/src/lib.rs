// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dropjob-core: data model shared by every other crate in the workspace.
//!
//! Nothing in this crate knows how a job file is parsed, how a command is
//! spawned, or how HTTP works — it only owns the types that describe a
//! scheduled job and its execution history, plus the small collaborator
//! traits (`Clock`) the rest of the workspace is built against.

pub mod clock;
pub mod cron_clock;
pub mod event;
pub mod id;
pub mod job;
pub mod run;
pub mod status;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, SystemClock};
pub use cron_clock::{CronClock, CronParseError};
pub use event::Event;
pub use id::JobId;
pub use job::{Job, Order, Task};
pub use run::{JobRun, TaskRun};
pub use status::RunStatus;
