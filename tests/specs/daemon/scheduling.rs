//! Single-task success and parallel-group ordering, driven through
//! `/runnow` rather than waiting on a real cron tick so the test doesn't
//! depend on wall-clock alignment.

use crate::prelude::*;

#[tokio::test]
async fn single_task_success_via_run_now() {
    let daemon = Daemon::spawn();
    daemon.write_job(
        "a",
        r#"
title = "greet"

[[tasks]]
name = "t"
cmd = "echo hi"
"#,
    );

    let job = wait_for_job(&daemon, "greet", POLL_MAX_MS, |_| true).await.expect("job loaded");
    let job_id = job["id"].as_u64().expect("id");

    let run = daemon.run_now(job_id).await;
    let run_index = run["run"].as_u64().expect("run index") as usize;

    let job = wait_for_job(&daemon, "greet", POLL_MAX_MS, |j| {
        job_run(j, run_index)["status"] == "success"
    })
    .await
    .expect("run finished");

    assert_eq!(job["history"].as_array().expect("history").len(), 1);
    let task = task_run(&job, run_index, 0);
    assert_eq!(task["status"], "success");
    assert!(task["rendered_command"].as_str().expect("cmd").contains("echo hi"));

    let output = daemon.last_output(job_id, run_index, 0).await;
    assert_eq!(output, "hi\n");
}

#[tokio::test]
async fn parallel_group_orders_by_barrier() {
    let daemon = Daemon::spawn();
    // `c` depends on both `a` and `b` finishing; each writes a line to a
    // shared file with a timestamp so the test can check ordering without
    // racing on wall-clock sleeps.
    let marker = daemon.jobs_dir.path().join("order.txt");
    let marker_path = marker.display().to_string();
    daemon.write_job(
        "grp",
        &format!(
            r#"
title = "grouped"
order = [["a", "b"], ["c"]]

[[tasks]]
name = "a"
cmd = "sleep 0.2 && echo a >> {marker_path}"

[[tasks]]
name = "b"
cmd = "echo b >> {marker_path}"

[[tasks]]
name = "c"
cmd = "echo c >> {marker_path}"
"#
        ),
    );

    let job = wait_for_job(&daemon, "grouped", POLL_MAX_MS, |_| true).await.expect("job loaded");
    let job_id = job["id"].as_u64().expect("id");
    let run = daemon.run_now(job_id).await;
    let run_index = run["run"].as_u64().expect("run index") as usize;

    wait_for_job(&daemon, "grouped", POLL_MAX_MS, |j| job_run(j, run_index)["status"] == "success")
        .await
        .expect("run finished");

    let contents = std::fs::read_to_string(&marker).expect("marker file");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.last(), Some(&"c"), "c must run after both a and b: {lines:?}");
    assert_eq!(lines.len(), 3);
}

#[tokio::test]
async fn successful_task_persists_a_log_file_when_logs_dir_configured() {
    let logs_dir = tempfile::tempdir().expect("logs tempdir");
    let daemon = Daemon::builder().logs_dir(logs_dir.path().to_path_buf()).spawn();
    daemon.write_job(
        "logged",
        r#"
title = "logthis"

[[tasks]]
name = "t"
cmd = "echo logged output"
"#,
    );

    let job = wait_for_job(&daemon, "logthis", POLL_MAX_MS, |_| true).await.expect("job loaded");
    let job_id = job["id"].as_u64().expect("id");
    let run = daemon.run_now(job_id).await;
    let run_index = run["run"].as_u64().expect("run index") as usize;

    let job = wait_for_job(&daemon, "logthis", POLL_MAX_MS, |j| {
        job_run(j, run_index)["status"] == "success"
    })
    .await
    .expect("run finished");

    let task = task_run(&job, run_index, 0);
    let log_path = task["log_path"].as_str().expect("log_path set");
    assert!(log_path.ends_with("_logthis_t.log"), "got: {log_path}");
    let contents = std::fs::read_to_string(log_path).expect("read persisted log");
    assert_eq!(contents, "logged output\n");
}
