// SPDX-License-Identifier: MIT

//! Validation and normalization of a decoded job file.

use std::collections::HashSet;

use dropjob_core::job::{Order, Task};

use crate::error::LoadError;
use crate::raw::RawJobFile;

pub struct Normalized {
    pub title: String,
    pub cron: String,
    pub tasks: Vec<Task>,
    pub order: Order,
    pub order_provided: bool,
    pub default_retries: u32,
    pub default_task_timeout_secs: u32,
    pub default_emails: Vec<String>,
    pub warnings: Vec<String>,
}

/// Coerce a negative count to zero, recording a warning under `label`.
fn coerce_nonneg(value: i64, label: &str, warnings: &mut Vec<String>) -> u32 {
    if value < 0 {
        warnings.push(format!("{label} was negative ({value}); coerced to 0"));
        0
    } else {
        value as u32
    }
}

pub fn validate(raw: RawJobFile) -> Result<Normalized, LoadError> {
    let title = raw.title.filter(|t| !t.is_empty()).ok_or(LoadError::MissingTitle)?;

    if raw.tasks.is_empty() {
        return Err(LoadError::EmptyTasks);
    }

    let mut warnings = Vec::new();
    let mut tasks = Vec::with_capacity(raw.tasks.len());
    let mut seen = HashSet::new();

    for (index, raw_task) in raw.tasks.into_iter().enumerate() {
        let name = raw_task
            .name
            .filter(|n| !n.is_empty())
            .ok_or(LoadError::TaskMissingName { index })?;
        let cmd = raw_task
            .cmd
            .filter(|c| !c.is_empty())
            .ok_or_else(|| LoadError::TaskMissingCmd { name: name.clone() })?;
        if !seen.insert(name.clone()) {
            return Err(LoadError::DuplicateTaskName { name });
        }
        let retries = coerce_nonneg(raw_task.retries, &format!("task {name:?} retries"), &mut warnings);
        let timeout_secs = coerce_nonneg(raw_task.timeout, &format!("task {name:?} timeout"), &mut warnings);
        tasks.push(Task {
            name,
            cmd,
            emails: raw_task.emails,
            retries,
            timeout_secs,
        });
    }

    let (order, order_provided) = match raw.order {
        Some(groups) => {
            for group in &groups {
                for name in group {
                    if !tasks.iter().any(|t| &t.name == name) {
                        return Err(LoadError::OrderUnknownTask { name: name.clone() });
                    }
                }
            }
            (Order(groups), true)
        }
        None => (Order::singleton_per_task(&tasks), false),
    };

    let default_retries = coerce_nonneg(raw.retries, "job retries", &mut warnings);
    let default_task_timeout_secs = coerce_nonneg(raw.task_timeout, "job task_timeout", &mut warnings);

    Ok(Normalized {
        title,
        cron: raw.cron,
        tasks,
        order,
        order_provided,
        default_retries,
        default_task_timeout_secs,
        default_emails: raw.emails,
        warnings,
    })
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
