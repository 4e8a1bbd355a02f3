//! Shared integration-test harness for running the `werewolf` binary as a
//! child process and talking to it over stdio.

#![allow(dead_code)]

use std::io::Write;
use std::process::{Output, Stdio};
use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

/// Default timeout for reading a single reply line.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs `werewolf` with `args`, feeds it `stdin`, closes stdin and waits.
#[allow(clippy::missing_panics_doc)]
pub fn run_with_input(args: &[&str], stdin: impl AsRef<[u8]>) -> Output {
    let bin = env!("CARGO_BIN_EXE_werewolf");
    let mut child = std::process::Command::new(bin)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn werewolf");

    // The child may exit before reading everything (e.g. on a startup
    // error), so a broken pipe here is not a failure.
    let _ = child
        .stdin
        .take()
        .expect("stdin not captured")
        .write_all(stdin.as_ref());

    child.wait_with_output().expect("failed to wait for werewolf")
}

/// Runs a one-shot `werewolf` subcommand with no stdin.
#[allow(clippy::missing_panics_doc)]
pub fn run_command(args: &[&str]) -> Output {
    let bin = env!("CARGO_BIN_EXE_werewolf");
    std::process::Command::new(bin)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .expect("failed to spawn werewolf")
}

/// A running `werewolf --input json` session, driven one line at a time.
///
/// The child process is killed on drop via `kill_on_drop(true)`.
pub struct WerewolfProcess {
    child: Child,
    stdin: Option<ChildStdin>,
    reader: BufReader<ChildStdout>,
}

impl WerewolfProcess {
    /// Spawns a JSON-mode session with extra `args`.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn_json(args: &[&str]) -> Self {
        let bin = env!("CARGO_BIN_EXE_werewolf");
        let mut child = Command::new(bin)
            .args(["--quiet", "play", "--input", "json"])
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .expect("failed to spawn werewolf");

        let stdin = child.stdin.take().expect("stdin not captured");
        let stdout = child.stdout.take().expect("stdout not captured");

        Self {
            child,
            stdin: Some(stdin),
            reader: BufReader::new(stdout),
        }
    }

    /// Writes one line to the session's stdin.
    #[allow(clippy::missing_panics_doc)]
    pub async fn send_line(&mut self, line: &str) {
        let stdin = self.stdin.as_mut().expect("stdin already closed");
        let mut buf = line.to_owned();
        buf.push('\n');
        stdin
            .write_all(buf.as_bytes())
            .await
            .expect("failed to write to stdin");
        stdin.flush().await.expect("failed to flush stdin");
    }

    /// Reads one JSON reply line.
    ///
    /// Panics on EOF, I/O error, or if no reply arrives within
    /// [`DEFAULT_TIMEOUT`].
    #[allow(clippy::missing_panics_doc)]
    pub async fn read_reply(&mut self) -> Value {
        let mut line = String::new();
        let result = tokio::time::timeout(DEFAULT_TIMEOUT, async {
            let n = self
                .reader
                .read_line(&mut line)
                .await
                .expect("read_line I/O error");
            assert!(n > 0, "unexpected EOF from werewolf");
            serde_json::from_str::<Value>(line.trim())
                .unwrap_or_else(|e| panic!("invalid JSON from werewolf: {e}\nline: {line}"))
        })
        .await;
        result.expect("timed out waiting for reply")
    }

    /// Sends `line` and returns the reply to it.
    pub async fn exchange(&mut self, line: &str) -> Value {
        self.send_line(line).await;
        self.read_reply().await
    }

    /// Closes stdin and waits for the process to exit.
    #[allow(clippy::missing_panics_doc)]
    pub async fn finish(mut self) -> std::process::ExitStatus {
        drop(self.stdin.take());
        tokio::time::timeout(DEFAULT_TIMEOUT, self.child.wait())
            .await
            .expect("timed out waiting for exit")
            .expect("failed to wait for werewolf")
    }
}
