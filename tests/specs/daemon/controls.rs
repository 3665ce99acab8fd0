//! `/onoff`, `/restart`, and `/parsingerrors` behavior not already
//! covered by the scheduling/retry/timeout/cancel specs.

use crate::prelude::*;

#[tokio::test]
async fn onoff_toggles_and_clears_next_scheduled() {
    let daemon = Daemon::spawn();
    daemon.write_job(
        "ticking",
        r#"
title = "ticking"
cron = "*/5 * * * * *"

[[tasks]]
name = "t"
cmd = "echo hi"
"#,
    );

    let job = wait_for_job(&daemon, "ticking", POLL_MAX_MS, |_| true).await.expect("job loaded");
    let job_id = job["id"].as_u64().expect("id");
    assert_eq!(job["on_off"], false);
    assert!(job["next_scheduled"].is_null());

    let toggled = daemon.onoff(job_id).await;
    assert_eq!(toggled["on_off"], true);
    let job = wait_for_job(&daemon, "ticking", POLL_MAX_MS, |j| j["on_off"] == true)
        .await
        .expect("on_off flipped");
    assert!(!job["next_scheduled"].is_null(), "turning on recomputes next_scheduled");

    let toggled_back = daemon.onoff(job_id).await;
    assert_eq!(toggled_back["on_off"], false);
    let job = wait_for_job(&daemon, "ticking", POLL_MAX_MS, |j| j["on_off"] == false)
        .await
        .expect("on_off flipped back");
    assert!(job["next_scheduled"].is_null(), "turning off clears next_scheduled");
}

#[tokio::test]
async fn restart_task_run_reruns_single_task_in_isolation() {
    let daemon = Daemon::spawn();
    daemon.write_job(
        "restartable",
        r#"
title = "restartable"

[[tasks]]
name = "t"
cmd = "echo first"
"#,
    );

    let job = wait_for_job(&daemon, "restartable", POLL_MAX_MS, |_| true).await.expect("job loaded");
    let job_id = job["id"].as_u64().expect("id");
    let run = daemon.run_now(job_id).await;
    let run_index = run["run"].as_u64().expect("run") as usize;
    wait_for_job(&daemon, "restartable", POLL_MAX_MS, |j| job_run(j, run_index)["status"] == "success")
        .await
        .expect("first run finished");

    let status = daemon.restart(job_id, run_index, Some(0)).await;
    assert!(status.is_success());

    let job = wait_for_job(&daemon, "restartable", POLL_MAX_MS, |j| {
        task_run(j, run_index, 0)["attempt"] == 1 && task_run(j, run_index, 0)["status"] == "success"
    })
    .await
    .expect("restarted task finished");
    assert_eq!(job_run(&job, run_index)["status"], "success");
}

#[tokio::test]
async fn invalid_job_file_is_recorded_in_parsing_errors_and_skipped() {
    let daemon = Daemon::spawn();
    daemon.write_job(
        "broken",
        r#"
title = "broken"
# no tasks at all
"#,
    );
    daemon.write_job(
        "fine",
        r#"
title = "fine"

[[tasks]]
name = "t"
cmd = "echo hi"
"#,
    );

    wait_for_job(&daemon, "fine", POLL_MAX_MS, |_| true).await.expect("valid job still loads");

    let errors = wait_for_async(POLL_MAX_MS, || async { !daemon.parsing_errors().await.is_empty() }).await;
    assert!(errors, "broken.job should be recorded in parsing errors");
    let text = daemon.parsing_errors().await;
    assert!(text.contains("broken.job"), "got: {text:?}");

    assert!(daemon.job_named("broken").await.is_none(), "invalid job is skipped, not registered");
}

#[tokio::test]
async fn unknown_job_id_returns_not_found() {
    let daemon = Daemon::spawn();
    let status = daemon.raw_get("/onoff?job=99999").await;
    assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
}
