//! Interactive phase console
//!
//! Read-evaluate-print loop over any async line source. Each line is turned
//! into an [`Instruction`] at the boundary; only recognized commands are
//! forwarded to the phase machine through a [`PhaseHandle`].
//!
//! Input is either bare tokens (`next`, `n`, `finish`, `f`, `quit`, `q`) or
//! one JSON [`GameMessage`] per line. Replies follow the same format.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{DispatchError, PhaseError, WerewolfError};
use crate::observability::events::{Event, EventEmitter};
use crate::observability::metrics;
use crate::phase::{
    Command, GameMessage, Instruction, Phase, PhaseHandle, PhaseTransition, parse_instruction,
};

/// Help line shown for unrecognized input.
pub const USAGE_HINT: &str = "Unknown command. Use: next|n | finish|f | quit|q";

/// Line format accepted by the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum InputMode {
    /// Bare tokens such as `next` or `q`, with human-readable replies.
    #[default]
    Text,
    /// One JSON `GameMessage` per line, with JSON replies.
    Json,
}

/// Console behavior switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOptions {
    /// Input and reply format.
    pub input: InputMode,
    /// Stop the loop as soon as the game reaches `Finished`.
    pub exit_on_finish: bool,
}

/// Why a console session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The operator sent `quit`.
    Quit,
    /// The input stream closed.
    EndOfInput,
    /// The game finished and `exit_on_finish` was set.
    Finished,
    /// The session was cancelled (Ctrl+C).
    Cancelled,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Quit => "quit",
            Self::EndOfInput => "end of input",
            Self::Finished => "game finished",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Outcome of a console session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    /// Phase when the session ended
    pub final_phase: Phase,
    /// Successful transitions during the session
    pub transitions: u64,
    /// Commands rejected by the machine
    pub rejected: u64,
    /// Lines that matched no instruction
    pub unrecognized: u64,
    /// Why the loop stopped
    pub stop_reason: StopReason,
}

/// JSON reply written in [`InputMode::Json`].
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum Reply {
    Ready {
        phase: Phase,
    },
    Ok {
        from: Phase,
        phase: Phase,
        command: Command,
    },
    Rejected {
        phase: Phase,
        command: Command,
        error: String,
    },
    Unrecognized {
        error: String,
    },
    Stopped {
        phase: Phase,
        reason: StopReason,
    },
}

/// The read-evaluate-print loop.
pub struct Console<R, W> {
    reader: R,
    writer: W,
    handle: PhaseHandle,
    options: ConsoleOptions,
    events: Arc<EventEmitter>,
    cancel: CancellationToken,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a console reading from `reader` and replying on `writer`.
    #[must_use]
    pub fn new(reader: R, writer: W, handle: PhaseHandle, options: ConsoleOptions) -> Self {
        Self {
            reader,
            writer,
            handle,
            options,
            events: Arc::new(EventEmitter::noop()),
            cancel: CancellationToken::new(),
        }
    }

    /// Sends structured events to `events`.
    #[must_use]
    pub fn with_events(mut self, events: Arc<EventEmitter>) -> Self {
        self.events = events;
        self
    }

    /// Ends the loop when `cancel` fires.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Consumes the console and returns its writer.
    ///
    /// Mostly useful in tests to inspect what was written.
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Runs the loop until quit, end of input, cancellation or (with
    /// `exit_on_finish`) the end of the game.
    ///
    /// Rejected and unrecognized input is reported on the writer and does
    /// not end the loop.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if reading or writing fails, or
    /// [`PhaseError::ActorStopped`] if the phase actor went away.
    pub async fn run(&mut self) -> Result<SessionSummary, WerewolfError> {
        let initial = self.handle.current().await?;
        self.events.emit(Event::GameStarted {
            timestamp: Utc::now(),
            phase: initial,
        });
        info!(phase = %initial, input = ?self.options.input, "session started");

        match self.options.input {
            InputMode::Text => {
                self.say("\nType commands: `next` (n), `finish` (f), `quit` (q). Ctrl+C to exit.\n\n")
                    .await?;
                self.say(&format!("Initial state: {initial}\n")).await?;
            }
            InputMode::Json => self.reply(&Reply::Ready { phase: initial }).await?,
        }

        let mut summary = SessionSummary {
            final_phase: initial,
            transitions: 0,
            rejected: 0,
            unrecognized: 0,
            stop_reason: StopReason::EndOfInput,
        };
        let mut buf = Vec::new();

        summary.stop_reason = loop {
            if self.options.input == InputMode::Text {
                self.say(">> ").await?;
            }

            buf.clear();
            let read = tokio::select! {
                biased;
                () = self.cancel.cancelled() => break StopReason::Cancelled,
                read = self.reader.read_until(b'\n', &mut buf) => read?,
            };
            if read == 0 {
                break StopReason::EndOfInput;
            }

            // Undecodable bytes are bad input, not a broken stream.
            let Ok(line) = std::str::from_utf8(&buf) else {
                summary.unrecognized += 1;
                let token = String::from_utf8_lossy(&buf).trim().to_owned();
                let err = DispatchError::UnrecognizedInstruction {
                    token: token.clone(),
                    suggestion: None,
                };
                self.unrecognized(token, &err).await?;
                continue;
            };

            let input = line.trim();
            if input.is_empty() {
                continue;
            }

            let parsed = match self.options.input {
                InputMode::Text => parse_instruction(input),
                InputMode::Json => GameMessage::from_json_line(input).map(|m| m.instruction()),
            };

            match parsed {
                Err(err) => {
                    summary.unrecognized += 1;
                    let input = input.to_owned();
                    self.unrecognized(input, &err).await?;
                }
                Ok(Instruction::Quit) => break StopReason::Quit,
                Ok(Instruction::Apply(command)) => match self.submit(command).await? {
                    Some(t) => {
                        summary.transitions += 1;
                        if self.options.exit_on_finish && t.to.is_terminal() {
                            if self.options.input == InputMode::Text {
                                self.say("Game finished; exiting.\n").await?;
                            }
                            break StopReason::Finished;
                        }
                    }
                    None => summary.rejected += 1,
                },
            }
        };

        summary.final_phase = self.handle.current().await?;
        self.events.emit(Event::GameStopped {
            timestamp: Utc::now(),
            phase: summary.final_phase,
            reason: summary.stop_reason.to_string(),
        });
        if self.options.input == InputMode::Json {
            self.reply(&Reply::Stopped {
                phase: summary.final_phase,
                reason: summary.stop_reason,
            })
            .await?;
        }
        info!(
            phase = %summary.final_phase,
            transitions = summary.transitions,
            rejected = summary.rejected,
            unrecognized = summary.unrecognized,
            reason = %summary.stop_reason,
            "session stopped"
        );

        Ok(summary)
    }

    /// Submits a command and reports the outcome.
    ///
    /// Returns `Some(transition)` on success and `None` if the machine
    /// rejected the command.
    async fn submit(&mut self, command: Command) -> Result<Option<PhaseTransition>, WerewolfError> {
        let result = self.handle.transition(command).await;

        // Phase the command was applied to, from the same round trip.
        if let Ok(PhaseTransition { from: phase, .. })
        | Err(PhaseError::InvalidTransition { from: phase, .. }) = result
        {
            debug!(%command, %phase, "command received");
            self.events.emit(Event::CommandReceived {
                timestamp: Utc::now(),
                command,
                phase,
            });
        }

        match result {
            Ok(t) => {
                self.events.emit(Event::PhaseEntered {
                    timestamp: Utc::now(),
                    from: t.from,
                    phase: t.to,
                    command,
                });
                match self.options.input {
                    InputMode::Text => {
                        self.say(&format!(
                            "{t}\nEntered {}. ({})\n",
                            t.to,
                            t.to.description()
                        ))
                        .await?;
                    }
                    InputMode::Json => {
                        self.reply(&Reply::Ok {
                            from: t.from,
                            phase: t.to,
                            command,
                        })
                        .await?;
                    }
                }
                Ok(Some(t))
            }
            Err(err @ PhaseError::InvalidTransition { from, .. }) => {
                self.events.emit(Event::CommandRejected {
                    timestamp: Utc::now(),
                    command,
                    phase: from,
                });
                match self.options.input {
                    InputMode::Text => {
                        self.say(&format!("Rejected: {err}. Phase remains {from}.\n"))
                            .await?;
                    }
                    InputMode::Json => {
                        self.reply(&Reply::Rejected {
                            phase: from,
                            command,
                            error: err.to_string(),
                        })
                        .await?;
                    }
                }
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn unrecognized(&mut self, input: String, err: &DispatchError) -> Result<(), WerewolfError> {
        debug!(%input, error = %err, "input rejected at boundary");
        metrics::record_unrecognized();
        self.events.emit(Event::InstructionUnrecognized {
            timestamp: Utc::now(),
            input,
        });

        match self.options.input {
            InputMode::Text => {
                let hint = match err {
                    DispatchError::UnrecognizedInstruction {
                        suggestion: Some(s),
                        ..
                    } => format!("{USAGE_HINT} (did you mean `{s}`?)\n"),
                    _ => format!("{USAGE_HINT}\n"),
                };
                self.say(&hint).await
            }
            InputMode::Json => {
                self.reply(&Reply::Unrecognized {
                    error: err.to_string(),
                })
                .await
            }
        }
    }

    async fn reply(&mut self, reply: &Reply) -> Result<(), WerewolfError> {
        let mut line = serde_json::to_string(reply)?;
        line.push('\n');
        self.say(&line).await
    }

    async fn say(&mut self, text: &str) -> Result<(), WerewolfError> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }
}

impl<R, W> std::fmt::Debug for Console<R, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("options", &self.options)
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}
