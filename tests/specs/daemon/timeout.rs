//! Timeout termination: a long-running task is killed after its timeout
//! elapses, output ends with an `ERROR:` line, and the notification
//! program fires exactly once.

use crate::prelude::*;

#[tokio::test]
async fn timeout_kills_task_and_notifies() {
    let daemon_dir = tempfile::tempdir().expect("tempdir");
    let notify_log = daemon_dir.path().join("notify.log");
    let notify_script = daemon_dir.path().join("notify.sh");
    std::fs::write(
        &notify_script,
        format!("#!/bin/sh\necho \"$@\" >> {}\n", notify_log.display()),
    )
    .expect("write notify script");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(&notify_script).expect("meta").permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&notify_script, perms).expect("chmod");
    }

    let daemon = Daemon::builder().notify_program(&notify_script.display().to_string()).spawn();
    daemon.write_job(
        "slow",
        r#"
title = "sleepy"

[[tasks]]
name = "t"
cmd = "sleep 5"
timeout = 1
"#,
    );

    let job = wait_for_job(&daemon, "sleepy", POLL_MAX_MS, |_| true).await.expect("job loaded");
    let job_id = job["id"].as_u64().expect("id");
    let run = daemon.run_now(job_id).await;
    let run_index = run["run"].as_u64().expect("run index") as usize;

    let started = std::time::Instant::now();
    let job = wait_for_job(&daemon, "sleepy", 3_000, |j| job_run(j, run_index)["status"] == "failure")
        .await
        .expect("run finished");
    assert!(started.elapsed().as_millis() < 3_000, "timeout should fire well before the 5s sleep finishes");

    let task = task_run(&job, run_index, 0);
    assert_eq!(task["status"], "failure");
    let output = daemon.last_output(job_id, run_index, 0).await;
    assert!(output.trim_end().ends_with("ERROR: task timed out"), "got: {output:?}");

    let notified = wait_for(2_000, || notify_log.exists());
    assert!(notified, "notification program should have run");
    let log = std::fs::read_to_string(&notify_log).expect("read notify log");
    assert_eq!(log.lines().count(), 1, "notified exactly once: {log:?}");
    assert!(log.contains("--job sleepy"));
    assert!(log.contains("--task t"));
}
