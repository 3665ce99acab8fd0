// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dropjob-jobfile: read, hash, decode, validate, and normalize `.job`
//! files into `dropjob_core::Job` templates.

pub mod discover;
pub mod error;
pub mod loader;
pub mod raw;
pub mod source;
pub mod template;
pub mod validate;

pub use discover::discover_job_files;
pub use error::LoadError;
pub use loader::{LoadOutcome, Loader};
pub use template::{render, TemplateError};
