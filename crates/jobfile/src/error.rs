// SPDX-License-Identifier: MIT

//! Loader/validation error taxonomy.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("read error: {0}")]
    Io(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("missing title")]
    MissingTitle,
    #[error("job has no tasks")]
    EmptyTasks,
    #[error("task {index} missing name")]
    TaskMissingName { index: usize },
    #[error("task {name:?} missing cmd")]
    TaskMissingCmd { name: String },
    #[error("duplicate task name {name:?}")]
    DuplicateTaskName { name: String },
    #[error("order references undefined task {name:?}")]
    OrderUnknownTask { name: String },
    #[error("invalid cron expression {expr:?}: {reason}")]
    InvalidCron { expr: String, reason: String },
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        LoadError::Io(e.to_string())
    }
}

impl From<toml::de::Error> for LoadError {
    fn from(e: toml::de::Error) -> Self {
        LoadError::Decode(e.to_string())
    }
}
