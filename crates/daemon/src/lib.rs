// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dropjob-daemon: wires the engine to the network. Owns process-wide
//! [`Config`], builds the axum [`http::router`], and drives the
//! reconcile-once-then-watch startup sequence from `main.rs`.

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod startup;
pub mod state;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use state::AppState;
