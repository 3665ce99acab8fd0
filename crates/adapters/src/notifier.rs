// SPDX-License-Identifier: MIT

//! Fire-and-forget invocation of the external failure-notification
//! program configured via `REPEATER_NOTIFY`.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::process::Command;

const NOTIFY_TIMEOUT: Duration = Duration::from_secs(30);

pub struct NotifyRequest<'a> {
    pub job_title: &'a str,
    pub task_name: &'a str,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub emails: &'a [String],
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync + 'static {
    async fn notify(&self, req: NotifyRequest<'_>);
}

/// Spawns `program` with `--job <title> --task <name> --start <RFC3339>
/// --end <RFC3339> [--emails "e1" "e2" …]`, fire-and-forget: failures are
/// logged, never propagated to the caller.
pub struct ProgramNotifier {
    program: String,
}

impl ProgramNotifier {
    /// Returns `None` if `program` is empty, matching `REPEATER_NOTIFY`
    /// being unset disabling notifications entirely.
    pub fn new(program: String) -> Option<Self> {
        if program.is_empty() {
            None
        } else {
            Some(Self { program })
        }
    }
}

#[async_trait::async_trait]
impl Notifier for ProgramNotifier {
    async fn notify(&self, req: NotifyRequest<'_>) {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--job")
            .arg(req.job_title)
            .arg("--task")
            .arg(req.task_name)
            .arg("--start")
            .arg(req.start.to_rfc3339())
            .arg("--end")
            .arg(req.end.to_rfc3339());
        if !req.emails.is_empty() {
            cmd.arg("--emails");
            for email in req.emails {
                cmd.arg(email);
            }
        }

        match tokio::time::timeout(NOTIFY_TIMEOUT, cmd.status()).await {
            Ok(Ok(status)) if status.success() => {
                tracing::debug!(program = %self.program, "notification program succeeded");
            }
            Ok(Ok(status)) => {
                tracing::warn!(program = %self.program, %status, "notification program exited non-zero");
            }
            Ok(Err(err)) => {
                tracing::warn!(program = %self.program, error = %err, "failed to spawn notification program");
            }
            Err(_) => {
                tracing::warn!(program = %self.program, "notification program timed out");
            }
        }
    }
}

/// Used when `REPEATER_NOTIFY` is unset.
#[derive(Default)]
pub struct NoOpNotifier;

#[async_trait::async_trait]
impl Notifier for NoOpNotifier {
    async fn notify(&self, _req: NotifyRequest<'_>) {}
}

#[cfg(test)]
#[path = "notifier_tests.rs"]
mod tests;
