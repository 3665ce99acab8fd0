// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dropjob-adapters: concrete implementations of the narrow collaborator
//! contracts named by `dropjob-core` and consumed by `dropjob-engine` and
//! `dropjob-daemon` — cron parsing, filesystem watching, external
//! notification, and signed-cookie auth tokens.

pub mod auth;
pub mod cron;
pub mod notifier;
pub mod watcher;

pub use auth::SigningSecret;
pub use cron::CronAdapter;
pub use notifier::{NoOpNotifier, Notifier, NotifyRequest, ProgramNotifier};
pub use watcher::{watch, DirectoryWatch, WatchError};
