//! Test helpers for behavioral specifications against the `dropjobd`
//! binary.
//!
//! These tests are black-box: they spawn the real daemon process against
//! a temporary jobs directory, drive it over HTTP with `reqwest`, and
//! assert on the observable state (`/jobs` snapshots, `/events`, task
//! output).

#![allow(dead_code)]

use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use serde_json::Value;

pub const POLL_INTERVAL_MS: u64 = 20;
pub const POLL_MAX_MS: u64 = 5_000;

/// Resolve the path to the `dropjobd` binary built alongside this test.
/// `cargo test` at the workspace root builds every workspace member's
/// binaries into the same `target/debug`, even though the root
/// `dropjob-specs` package doesn't depend on `dropjob-daemon` directly.
pub fn dropjobd_binary() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let standard = manifest_dir.join("target/debug/dropjobd");
    if standard.exists() {
        return standard;
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join("dropjobd");
            if fallback.exists() {
                return fallback;
            }
        }
    }
    standard
}

/// Bind an ephemeral port and immediately release it, so the daemon can
/// be told a concrete `REPEATER_PORT` ahead of spawning it. Carries the
/// usual time-of-check/time-of-use race of this pattern; acceptable for
/// test isolation on a CI runner where nothing else is racing for ports.
fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    listener.local_addr().expect("local addr").port()
}

/// Poll `condition` until it returns true or the timeout elapses.
pub fn wait_for<F: FnMut() -> bool>(timeout_ms: u64, mut condition: F) -> bool {
    let start = Instant::now();
    let timeout = Duration::from_millis(timeout_ms);
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(POLL_INTERVAL_MS));
    }
    false
}

/// A running `dropjobd` process pointed at a temporary jobs directory.
pub struct Daemon {
    child: Child,
    pub base_url: String,
    pub jobs_dir: tempfile::TempDir,
    pub client: reqwest::Client,
}

pub struct DaemonBuilder {
    password: String,
    notify_program: String,
    logs_dir: Option<PathBuf>,
}

impl DaemonBuilder {
    fn new() -> Self {
        Self {
            password: String::new(),
            notify_program: String::new(),
            logs_dir: None,
        }
    }

    pub fn password(mut self, password: &str) -> Self {
        self.password = password.to_string();
        self
    }

    pub fn notify_program(mut self, program: &str) -> Self {
        self.notify_program = program.to_string();
        self
    }

    pub fn logs_dir(mut self, dir: PathBuf) -> Self {
        self.logs_dir = Some(dir);
        self
    }

    /// Spawn the daemon and block until `/parsingerrors` answers (proof
    /// the HTTP listener is up and the first reconcile has completed).
    pub fn spawn(self) -> Daemon {
        let jobs_dir = tempfile::tempdir().expect("tempdir");
        let port = free_port();
        let base_url = format!("http://127.0.0.1:{port}");

        let mut cmd = Command::new(dropjobd_binary());
        cmd.env("REPEATER_PORT", format!(":{port}"))
            .env("REPEATER_JOBS_DIRECTORY", jobs_dir.path())
            .env("REPEATER_PASSWORD", &self.password)
            .env("REPEATER_NOTIFY", &self.notify_program)
            .env("RUST_LOG", "warn")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        match self.logs_dir {
            Some(dir) => {
                cmd.env("REPEATER_LOGS_DIRECTORY", dir);
            }
            None => {
                cmd.env("REPEATER_LOGS_DIRECTORY", "");
            }
        }

        let child = cmd.spawn().expect("spawn dropjobd");
        let client = reqwest::Client::builder().cookie_store(true).build().expect("client");

        let daemon = Daemon { child, base_url, jobs_dir, client };
        daemon.wait_until_ready();
        daemon
    }
}

impl Daemon {
    pub fn builder() -> DaemonBuilder {
        DaemonBuilder::new()
    }

    pub fn spawn() -> Daemon {
        Self::builder().spawn()
    }

    fn wait_until_ready(&self) {
        let addr = self.base_url.trim_start_matches("http://").to_string();
        let ready = wait_for(POLL_MAX_MS, || std::net::TcpStream::connect(&addr).is_ok());
        assert!(ready, "dropjobd did not become ready in time");
    }

    /// Write a `.job` file into the watched directory, returning its path.
    pub fn write_job(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.jobs_dir.path().join(format!("{name}.job"));
        std::fs::write(&path, contents).expect("write job file");
        path
    }

    pub fn remove_job(&self, name: &str) {
        let path = self.jobs_dir.path().join(format!("{name}.job"));
        std::fs::remove_file(path).expect("remove job file");
    }

    pub async fn jobs(&self) -> Vec<Value> {
        self.client
            .get(format!("{}/jobs", self.base_url))
            .send()
            .await
            .expect("GET /jobs")
            .json()
            .await
            .expect("decode /jobs")
    }

    pub async fn job_named(&self, title: &str) -> Option<Value> {
        self.jobs().await.into_iter().find(|j| j["title"] == title)
    }

    pub async fn parsing_errors(&self) -> String {
        self.client
            .get(format!("{}/parsingerrors", self.base_url))
            .send()
            .await
            .expect("GET /parsingerrors")
            .text()
            .await
            .expect("read /parsingerrors")
    }

    pub async fn onoff(&self, job_id: u64) -> Value {
        self.client
            .get(format!("{}/onoff", self.base_url))
            .query(&[("job", job_id)])
            .send()
            .await
            .expect("GET /onoff")
            .json()
            .await
            .expect("decode /onoff")
    }

    pub async fn run_now(&self, job_id: u64) -> Value {
        self.client
            .get(format!("{}/runnow", self.base_url))
            .query(&[("job", job_id)])
            .send()
            .await
            .expect("GET /runnow")
            .json()
            .await
            .expect("decode /runnow")
    }

    pub async fn cancel(&self, job_id: u64, run: usize, task: Option<usize>) -> reqwest::StatusCode {
        let mut query = vec![("job", job_id.to_string()), ("run", run.to_string())];
        if let Some(t) = task {
            query.push(("task", t.to_string()));
        }
        self.client
            .get(format!("{}/cancel", self.base_url))
            .query(&query)
            .send()
            .await
            .expect("GET /cancel")
            .status()
    }

    pub async fn restart(&self, job_id: u64, run: usize, task: Option<usize>) -> reqwest::StatusCode {
        let mut query = vec![("job", job_id.to_string()), ("run", run.to_string())];
        if let Some(t) = task {
            query.push(("task", t.to_string()));
        }
        self.client
            .get(format!("{}/restart", self.base_url))
            .query(&query)
            .send()
            .await
            .expect("GET /restart")
            .status()
    }

    pub async fn last_output(&self, job_id: u64, run: usize, task: usize) -> String {
        self.client
            .get(format!("{}/lastoutput", self.base_url))
            .query(&[("job", job_id.to_string()), ("run", run.to_string()), ("task", task.to_string())])
            .send()
            .await
            .expect("GET /lastoutput")
            .text()
            .await
            .expect("read /lastoutput")
    }

    pub async fn login(&self, password: &str) -> reqwest::StatusCode {
        self.client
            .post(format!("{}/login", self.base_url))
            .json(&serde_json::json!({ "password": password }))
            .send()
            .await
            .expect("POST /login")
            .status()
    }

    pub async fn raw_get(&self, path: &str) -> reqwest::StatusCode {
        self.client.get(format!("{}{path}", self.base_url)).send().await.expect("GET").status()
    }
}

impl Drop for Daemon {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Poll an async condition until it returns true or the timeout elapses.
pub async fn wait_for_async<F, Fut>(timeout_ms: u64, mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let start = Instant::now();
    let timeout = Duration::from_millis(timeout_ms);
    loop {
        if condition().await {
            return true;
        }
        if start.elapsed() > timeout {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
    }
}

/// Poll `/jobs` until a job named `title` satisfies `pred`.
pub async fn wait_for_job<F>(daemon: &Daemon, title: &str, timeout_ms: u64, mut pred: F) -> Option<Value>
where
    F: FnMut(&Value) -> bool,
{
    let start = Instant::now();
    loop {
        if let Some(job) = daemon.job_named(title).await {
            if pred(&job) {
                return Some(job);
            }
        }
        if start.elapsed() > Duration::from_millis(timeout_ms) {
            return None;
        }
        tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
    }
}

pub fn job_run<'a>(job: &'a Value, run: usize) -> &'a Value {
    &job["history"][run]
}

pub fn task_run<'a>(job: &'a Value, run: usize, task: usize) -> &'a Value {
    &job["history"][run]["task_runs"][task]
}
