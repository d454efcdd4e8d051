// src/console/controller.rs
//! Foreground read-eval loop

use crate::console::commands::{Command, parse_command, usage};
use crate::console::editor::{Prompt, ReadEvent};
use crate::context::MinerContext;
use crate::stats::state::{HashrateGauge, MiningState};
use crate::utils::format::{format_hashes, format_uptime, quote};
use crate::utils::version;
use log::{debug, warn};
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Why the console loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Ctrl-C on an empty line
    Interrupted,
    /// `bye`, `exit` or `quit`
    Quit,
    /// Input closed and the shared token was cancelled elsewhere
    InputClosed,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::Interrupted => write!(f, "interrupted"),
            ExitReason::Quit => write!(f, "quit requested"),
            ExitReason::InputClosed => write!(f, "input closed"),
        }
    }
}

enum Flow {
    Continue,
    Shutdown,
}

/// Translates console lines into commands
///
/// The controller never exits the process itself. It cancels the shared
/// token and returns an [`ExitReason`]; the caller decides how to stop.
pub struct ConsoleController<W: Write> {
    events: mpsc::Receiver<ReadEvent>,
    out: W,
    prompt: Arc<dyn Prompt>,
    state: Arc<MiningState>,
    hashrate: Arc<HashrateGauge>,
    started: Instant,
    cancel: CancellationToken,
}

impl<W: Write> ConsoleController<W> {
    /// Creates a controller reading `events` and writing to `out`
    pub fn new(
        ctx: &MinerContext,
        events: mpsc::Receiver<ReadEvent>,
        prompt: Arc<dyn Prompt>,
        out: W,
    ) -> Self {
        ConsoleController {
            events,
            out,
            prompt,
            state: Arc::clone(&ctx.state),
            hashrate: Arc::clone(&ctx.hashrate),
            started: ctx.started,
            cancel: ctx.cancel.clone(),
        }
    }

    /// Output written so far
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Runs until shutdown is requested or input ends
    ///
    /// A closed event channel counts as end of input.
    pub async fn run(&mut self) -> ExitReason {
        loop {
            let event = self.events.recv().await.unwrap_or(ReadEvent::Eof);

            match event {
                ReadEvent::Interrupt { pending } if pending.is_empty() => {
                    return self.interrupt();
                }
                ReadEvent::Interrupt { .. } => continue,
                ReadEvent::Eof => return self.wait_for_shutdown().await,
                ReadEvent::Line(line) => {
                    let command = parse_command(&line);
                    let flow = self.execute(command).unwrap_or_else(|e| {
                        warn!("Console write failed: {}", e);
                        Flow::Continue
                    });
                    if let Flow::Shutdown = flow {
                        self.cancel.cancel();
                        return ExitReason::Quit;
                    }
                }
            }

            self.prompt.refresh();
        }
    }

    fn interrupt(&mut self) -> ExitReason {
        self.write_line("Ctrl-C received, Exit in progress");
        self.cancel.cancel();
        ExitReason::Interrupted
    }

    /// Blocks after end of input until the shared token fires
    ///
    /// Lines can no longer arrive, but Ctrl-C on the terminal still does.
    async fn wait_for_shutdown(&mut self) -> ExitReason {
        debug!("Console input closed, waiting for shutdown");
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => return ExitReason::InputClosed,
                event = self.events.recv() => match event {
                    Some(ReadEvent::Interrupt { pending }) if pending.is_empty() => {
                        return self.interrupt();
                    }
                    Some(_) => continue,
                    None => {
                        self.cancel.cancelled().await;
                        return ExitReason::InputClosed;
                    }
                },
            }
        }
    }

    fn execute(&mut self, command: Command) -> io::Result<Flow> {
        match command {
            Command::Help => usage(&mut self.out)?,
            Command::Status => self.status()?,
            Command::Say(text) => {
                if text.is_empty() {
                    writeln!(self.out, "say what?")?;
                } else {
                    debug!("Ignoring say: {}", text);
                }
            }
            Command::Version => writeln!(self.out, "{}", version::version_line())?,
            Command::Quit => return Ok(Flow::Shutdown),
            Command::Empty => {}
            Command::Echo(line) => writeln!(self.out, "you said: {}", quote(&line))?,
        }
        self.out.flush()?;
        Ok(Flow::Continue)
    }

    fn status(&mut self) -> io::Result<()> {
        let network = if self.state.testnet() { "testnet" } else { "mainnet" };
        writeln!(
            self.out,
            "Hashrate: {}/s | Accepted/Rejected: {}/{} | Pool: {} | Network: {} | Uptime: {}",
            format_hashes(self.hashrate.get()),
            self.state.accepted_shares(),
            self.state.rejected_shares(),
            self.state.pool_url(),
            network,
            format_uptime(self.started.elapsed()),
        )
    }

    fn write_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{}", line).and_then(|_| self.out.flush()) {
            warn!("Console write failed: {}", e);
        }
    }
}
