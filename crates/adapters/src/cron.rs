// SPDX-License-Identifier: MIT

//! Cron-expression parsing and humanization, backed by the `cron` crate.
//!
//! Job files write schedules in the common 5-field cron shape (minute
//! hour day-of-month month day-of-week), with an optional leading
//! seconds field. The `cron` crate requires the seconds field, so a
//! 5-field expression is normalized to 6 fields by prepending `"0 "`
//! before handing it to `cron::Schedule`.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use cron::Schedule;
use dropjob_core::cron_clock::{CronClock, CronParseError};

#[derive(Debug, Default, Clone, Copy)]
pub struct CronAdapter;

impl CronAdapter {
    pub fn new() -> Self {
        Self
    }

    fn normalize(expr: &str) -> String {
        let field_count = expr.split_whitespace().count();
        if field_count == 5 {
            format!("0 {expr}")
        } else {
            expr.to_string()
        }
    }

    fn schedule(expr: &str) -> Result<Schedule, CronParseError> {
        let normalized = Self::normalize(expr);
        Schedule::from_str(&normalized).map_err(|e| CronParseError(e.to_string()))
    }
}

impl CronClock for CronAdapter {
    fn parse(&self, expr: &str) -> Result<(), CronParseError> {
        Self::schedule(expr).map(|_| ())
    }

    fn humanize(&self, expr: &str) -> Option<String> {
        humanize(expr)
    }

    fn next_after(&self, expr: &str, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        Self::schedule(expr).ok()?.after(&after).next()
    }
}

/// Recognizes a handful of common shapes; anything else returns `None`
/// so the caller falls back to the raw expression text.
fn humanize(expr: &str) -> Option<String> {
    let normalized = CronAdapter::normalize(expr);
    let fields: Vec<&str> = normalized.split_whitespace().collect();
    let [sec, min, hour, dom, month, dow, ..] = fields[..] else {
        return None;
    };

    if let Some(stripped) = sec.strip_prefix("*/") {
        if min == "*" && hour == "*" && dom == "*" && month == "*" && dow == "*" {
            let n: u32 = stripped.parse().ok()?;
            return Some(format!("every {n} seconds"));
        }
    }

    if sec == "0" {
        if let (Ok(h), Ok(m)) = (hour.parse::<u32>(), min.parse::<u32>()) {
            if h < 24 && m < 60 {
                if dom == "*" && month == "*" && dow == "*" {
                    return Some(format!("every day at {h:02}:{m:02}"));
                }
                return Some(format!("at {h:02}:{m:02}"));
            }
        }
    }

    None
}

#[cfg(test)]
#[path = "cron_tests.rs"]
mod tests;
