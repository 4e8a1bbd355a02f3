mod common;

use common::{WerewolfProcess, run_command, run_with_input};

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// ============================================================================
// Text-mode sessions
// ============================================================================

#[test]
fn text_session_full_cycle() {
    let output = run_with_input(&["--quiet"], "next\nnext\nfinish\nnext\nquit\n");
    assert!(
        output.status.success(),
        "quit should exit 0: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = stdout_of(&output);
    assert!(stdout.contains("Initial state: Night"), "{stdout}");
    assert!(stdout.contains("Night -> Day"), "{stdout}");
    assert!(stdout.contains("Day -> Night"), "{stdout}");
    assert!(stdout.contains("Night -> Finished"), "{stdout}");
    assert!(
        stdout.contains("cannot apply 'next' in phase Finished"),
        "next after finish should be rejected: {stdout}"
    );
}

#[test]
fn text_session_short_aliases() {
    let output = run_with_input(&["--quiet", "play"], "n\nf\nq\n");
    assert!(output.status.success());

    let stdout = stdout_of(&output);
    assert!(stdout.contains("Night -> Day"), "{stdout}");
    assert!(stdout.contains("Day -> Finished"), "{stdout}");
}

#[test]
fn text_session_unrecognized_input_keeps_running() {
    let output = run_with_input(&["--quiet"], "x\n\nnext\nq\n");
    assert!(output.status.success());

    let stdout = stdout_of(&output);
    assert!(
        stdout.contains("Unknown command. Use: next|n | finish|f | quit|q"),
        "{stdout}"
    );
    assert!(
        stdout.contains("Night -> Day"),
        "session should continue after bad input: {stdout}"
    );
}

#[test]
fn text_session_suggests_close_token() {
    let output = run_with_input(&["--quiet"], "nxet\nq\n");
    assert!(output.status.success());

    let stdout = stdout_of(&output);
    assert!(stdout.contains("did you mean `next`?"), "{stdout}");
}

#[test]
fn end_of_input_exits_cleanly() {
    let output = run_with_input(&["--quiet"], "next\n");
    assert!(
        output.status.success(),
        "EOF should be treated like quit: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn exit_on_finish_stops_at_finished() {
    let output = run_with_input(
        &["--quiet", "play", "--exit-on-finish"],
        "finish\nnext\nnext\n",
    );
    assert!(output.status.success());

    let stdout = stdout_of(&output);
    assert!(stdout.contains("Game finished; exiting."), "{stdout}");
    assert!(
        !stdout.contains("Rejected"),
        "no input should be processed after finishing: {stdout}"
    );
}

#[test]
fn root_exit_on_finish_applies_to_play_subcommand() {
    let output = run_with_input(&["--quiet", "--exit-on-finish", "play"], "f\nn\n");
    assert!(output.status.success());

    let stdout = stdout_of(&output);
    assert!(stdout.contains("Game finished; exiting."), "{stdout}");
    assert!(!stdout.contains("Rejected"), "{stdout}");
}

#[test]
fn invalid_utf8_line_does_not_end_session() {
    let output = run_with_input(&["--quiet"], b"n\n\xff\nn\nq\n");
    assert!(
        output.status.success(),
        "undecodable input should be rejected, not fatal: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = stdout_of(&output);
    assert!(stdout.contains("Unknown command."), "{stdout}");
    assert!(stdout.contains("Day -> Night"), "{stdout}");
}

#[test]
fn logging_goes_to_stderr_only() {
    let output = run_with_input(&["-vv"], "next\nq\n");
    assert!(output.status.success());

    let stdout = stdout_of(&output);
    assert!(
        !stdout.contains("phase transition"),
        "log lines must not appear on stdout: {stdout}"
    );
}

// ============================================================================
// JSON-mode sessions
// ============================================================================

#[tokio::test]
async fn json_session_replies_per_line() {
    let mut proc = WerewolfProcess::spawn_json(&[]);

    let ready = proc.read_reply().await;
    assert_eq!(ready["status"], "ready");
    assert_eq!(ready["phase"], "night");

    let ok = proc.exchange(r#"{"command":"next"}"#).await;
    assert_eq!(ok["status"], "ok");
    assert_eq!(ok["from"], "night");
    assert_eq!(ok["phase"], "day");

    let ok = proc.exchange(r#"{"command":"finish"}"#).await;
    assert_eq!(ok["phase"], "finished");

    let rejected = proc.exchange(r#"{"command":"finish"}"#).await;
    assert_eq!(rejected["status"], "rejected");
    assert_eq!(rejected["phase"], "finished");

    let bad = proc.exchange("not json").await;
    assert_eq!(bad["status"], "unrecognized");

    let stopped = proc.exchange(r#"{"command":"quit"}"#).await;
    assert_eq!(stopped["status"], "stopped");
    assert_eq!(stopped["reason"], "quit");

    let status = proc.finish().await;
    assert!(status.success());
}

#[tokio::test]
async fn json_session_end_of_input() {
    let mut proc = WerewolfProcess::spawn_json(&[]);
    let _ = proc.read_reply().await;
    let status = proc.finish().await;
    assert!(status.success());
}

// ============================================================================
// Events file
// ============================================================================

#[test]
fn events_file_records_session() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("events.jsonl");
    let path_str = path.to_str().expect("UTF-8 path");

    let output = run_with_input(
        &["--quiet", "play", "--events-file", path_str],
        "next\nbogus\nfinish\nfinish\nq\n",
    );
    assert!(output.status.success());

    let contents = std::fs::read_to_string(&path).expect("events file should exist");
    let events: Vec<serde_json::Value> = contents
        .lines()
        .map(|l| serde_json::from_str(l).expect("each line is JSON"))
        .collect();

    let types: Vec<&str> = events
        .iter()
        .map(|e| e["type"].as_str().expect("type tag"))
        .collect();
    assert_eq!(types.first(), Some(&"GameStarted"));
    assert_eq!(types.last(), Some(&"GameStopped"));
    assert_eq!(types.iter().filter(|t| **t == "PhaseEntered").count(), 2);
    assert!(types.contains(&"InstructionUnrecognized"));
    assert!(types.contains(&"CommandRejected"));

    for (i, event) in events.iter().enumerate() {
        assert_eq!(event["sequence"], i as u64, "sequence must be contiguous");
    }
}

#[test]
fn events_file_in_missing_directory_is_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("missing").join("events.jsonl");

    let output = run_with_input(
        &["--quiet", "play", "--events-file", path.to_str().expect("UTF-8 path")],
        "q\n",
    );
    assert_eq!(output.status.code(), Some(3));
}

// ============================================================================
// version / completions
// ============================================================================

#[test]
fn version_human() {
    let output = run_command(&["version"]);
    assert!(output.status.success());

    let stdout = stdout_of(&output);
    assert!(stdout.contains("werewolf"), "{stdout}");
    assert!(stdout.contains('.'), "{stdout}");
}

#[test]
fn version_json() {
    let output = run_command(&["version", "--format", "json"]);
    assert!(output.status.success());

    let parsed: serde_json::Value =
        serde_json::from_str(&stdout_of(&output)).expect("version JSON should be valid");
    assert_eq!(parsed["name"], "werewolf");
    assert!(parsed.get("version").is_some());
}

#[test]
fn completions_bash() {
    let output = run_command(&["completions", "bash"]);
    assert!(output.status.success());

    let stdout = stdout_of(&output);
    assert!(stdout.contains("werewolf"), "{stdout}");
}

#[test]
fn unknown_flag_is_usage_error() {
    let output = run_command(&["--no-such-flag"]);
    assert!(!output.status.success());
}
