// src/console/editor.rs
//! Line-editor seam
//!
//! The controller only needs two things from the terminal: a stream of input
//! events and a way to rewrite the prompt. On a TTY, [`spawn_terminal_input`]
//! puts the terminal in raw mode and feeds key presses through a
//! [`LineEditor`], so the partially typed line is known when Ctrl-C arrives
//! and survives prompt redraws. Tests feed events through a channel directly.

use arc_swap::ArcSwap;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{self, ClearType};
use crossterm::{cursor, queue};
use log::{debug, warn};
use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Capacity of the input event channel
const EVENT_BUFFER: usize = 16;

/// One result of reading from the line editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadEvent {
    /// A complete line (not yet trimmed)
    Line(String),
    /// Ctrl-C, carrying whatever was typed on the current line
    Interrupt {
        /// Input buffered when the interrupt arrived
        pending: String,
    },
    /// Input stream closed
    Eof,
}

/// Anything that can display the console prompt
pub trait Prompt: Send + Sync {
    /// Replaces the prompt text
    fn set_prompt(&self, prompt: &str);

    /// Redraws the prompt after other output
    fn refresh(&self) {}
}

/// Buffer for the line being typed, fed one key at a time
#[derive(Debug, Default)]
pub struct LineEditor {
    buffer: String,
}

impl LineEditor {
    /// Creates an editor with an empty line
    pub fn new() -> Self {
        Self::default()
    }

    /// Text typed so far on the current line
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    /// Applies one key press
    ///
    /// Returns an event once the line is submitted or interrupted; the
    /// buffer is cleared in both cases. Ctrl-D on an empty line is end of
    /// input.
    pub fn on_key(&mut self, key: KeyEvent) -> Option<ReadEvent> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') if ctrl => Some(ReadEvent::Interrupt {
                pending: std::mem::take(&mut self.buffer),
            }),
            KeyCode::Char('d') if ctrl && self.buffer.is_empty() => Some(ReadEvent::Eof),
            KeyCode::Char(_) if ctrl => None,
            KeyCode::Char(c) => {
                self.buffer.push(c);
                None
            }
            KeyCode::Backspace => {
                self.buffer.pop();
                None
            }
            KeyCode::Enter => Some(ReadEvent::Line(std::mem::take(&mut self.buffer))),
            _ => None,
        }
    }
}

/// Prompt rendered on stdout followed by the line being typed
#[derive(Debug)]
pub struct TerminalPrompt {
    current: ArcSwap<String>,
    pending: ArcSwap<String>,
}

impl TerminalPrompt {
    /// Creates a prompt with empty text
    pub fn new() -> Self {
        TerminalPrompt {
            current: ArcSwap::from_pointee(String::new()),
            pending: ArcSwap::from_pointee(String::new()),
        }
    }

    /// Records the partially typed line so redraws keep it visible
    pub fn set_pending(&self, text: &str) {
        self.pending.store(Arc::new(text.to_string()));
    }

    /// Clears the current line and writes prompt plus pending input
    pub fn draw_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        queue!(
            out,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print(self.current.load().as_str()),
            Print(self.pending.load().as_str())
        )?;
        out.flush()
    }

    fn draw(&self) {
        if let Err(e) = self.draw_to(&mut io::stdout().lock()) {
            debug!("Prompt redraw failed: {}", e);
        }
    }

    /// Ends the drawn line so the next output starts below it
    fn newline(&self) {
        let mut stdout = io::stdout().lock();
        if let Err(e) = stdout.write_all(b"\r\n").and_then(|_| stdout.flush()) {
            debug!("Prompt newline failed: {}", e);
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for TerminalPrompt {
    fn set_prompt(&self, prompt: &str) {
        self.current.store(Arc::new(prompt.to_string()));
        self.draw();
    }

    fn refresh(&self) {
        self.draw();
    }
}

/// Writer that expands `\n` to `\r\n`
///
/// Raw mode turns off output post-processing, so anything printed while the
/// editor owns the terminal goes through this.
#[derive(Debug)]
pub struct CrlfWriter<W> {
    inner: W,
}

impl<W: Write> CrlfWriter<W> {
    /// Wraps `inner`
    pub fn new(inner: W) -> Self {
        CrlfWriter { inner }
    }
}

impl<W: Write> Write for CrlfWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut start = 0;
        for (i, byte) in buf.iter().enumerate() {
            if *byte == b'\n' {
                self.inner.write_all(&buf[start..i])?;
                self.inner.write_all(b"\r\n")?;
                start = i + 1;
            }
        }
        self.inner.write_all(&buf[start..])?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Keeps the terminal in raw mode until dropped
#[derive(Debug)]
pub struct RawModeGuard(());

impl RawModeGuard {
    /// Switches the terminal to raw mode
    pub fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(RawModeGuard(()))
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("Failed to restore terminal mode: {}", e);
        }
    }
}

/// Event stream plus the terminal state that must outlive it
pub struct TerminalInput {
    /// Console input events
    pub events: mpsc::Receiver<ReadEvent>,
    /// Present while the terminal is in raw mode
    pub raw_mode: Option<RawModeGuard>,
}

/// Starts reading the terminal and returns the event stream
///
/// A TTY is read key by key in raw mode, echoing through `prompt`. Piped
/// input falls back to whole lines, with Ctrl-C caught by `tokio::signal`
/// and reported with no pending input. Must be called inside a tokio
/// runtime.
pub fn spawn_terminal_input(prompt: Arc<TerminalPrompt>) -> TerminalInput {
    let (tx, rx) = mpsc::channel(EVENT_BUFFER);

    let raw_mode = if io::stdin().is_terminal() {
        match RawModeGuard::enable() {
            Ok(guard) => Some(guard),
            Err(e) => {
                warn!("Raw terminal mode unavailable, reading whole lines: {}", e);
                None
            }
        }
    } else {
        None
    };

    if raw_mode.is_some() {
        let keys = tx.clone();
        std::thread::spawn(move || read_keys(&prompt, &keys));
    } else {
        let lines = tx.clone();
        std::thread::spawn(move || read_lines(&lines));
    }

    // In raw mode the key reader sees Ctrl-C itself; this only catches
    // signals sent from outside.
    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Unable to listen for Ctrl-C: {}", e);
                return;
            }
            let interrupt = ReadEvent::Interrupt {
                pending: String::new(),
            };
            if tx.send(interrupt).await.is_err() {
                return;
            }
        }
    });

    TerminalInput {
        events: rx,
        raw_mode,
    }
}

fn read_keys(prompt: &TerminalPrompt, tx: &mpsc::Sender<ReadEvent>) {
    let mut editor = LineEditor::new();
    loop {
        let key = match event::read() {
            Ok(Event::Key(key)) => key,
            Ok(_) => continue,
            Err(e) => {
                warn!("Failed to read console input: {}", e);
                break;
            }
        };

        let Some(read) = editor.on_key(key) else {
            prompt.set_pending(editor.pending());
            prompt.refresh();
            continue;
        };

        prompt.set_pending("");
        if read != ReadEvent::Eof {
            prompt.newline();
        }
        // Keep reading after Ctrl-D so a later Ctrl-C can still stop the miner.
        if tx.blocking_send(read).is_err() {
            return;
        }
    }
    let _ = tx.blocking_send(ReadEvent::Eof);
}

fn read_lines(tx: &mpsc::Sender<ReadEvent>) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        match line {
            Ok(line) => {
                if tx.blocking_send(ReadEvent::Line(line)).is_err() {
                    return;
                }
            }
            Err(e) => {
                warn!("Failed to read console input: {}", e);
                break;
            }
        }
    }
    let _ = tx.blocking_send(ReadEvent::Eof);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn type_text(editor: &mut LineEditor, text: &str) {
        for c in text.chars() {
            assert_eq!(editor.on_key(key(KeyCode::Char(c), KeyModifiers::NONE)), None);
        }
    }

    #[test]
    fn test_ctrl_c_carries_the_typed_line() {
        let mut editor = LineEditor::new();
        type_text(&mut editor, "stat");

        let event = editor.on_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(
            event,
            Some(ReadEvent::Interrupt {
                pending: "stat".to_string()
            })
        );
        assert_eq!(editor.pending(), "");
    }

    #[test]
    fn test_ctrl_c_on_empty_line() {
        let mut editor = LineEditor::new();
        let event = editor.on_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(
            event,
            Some(ReadEvent::Interrupt {
                pending: String::new()
            })
        );
    }

    #[test]
    fn test_enter_submits_and_backspace_edits() {
        let mut editor = LineEditor::new();
        type_text(&mut editor, "helpp");
        assert_eq!(editor.on_key(key(KeyCode::Backspace, KeyModifiers::NONE)), None);
        assert_eq!(editor.pending(), "help");

        let event = editor.on_key(key(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(event, Some(ReadEvent::Line("help".to_string())));
        assert_eq!(editor.pending(), "");
    }

    #[test]
    fn test_ctrl_d_only_ends_input_on_empty_line() {
        let mut editor = LineEditor::new();
        type_text(&mut editor, "x");
        assert_eq!(editor.on_key(key(KeyCode::Char('d'), KeyModifiers::CONTROL)), None);
        assert_eq!(editor.pending(), "x");

        editor.on_key(key(KeyCode::Backspace, KeyModifiers::NONE));
        assert_eq!(
            editor.on_key(key(KeyCode::Char('d'), KeyModifiers::CONTROL)),
            Some(ReadEvent::Eof)
        );
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut editor = LineEditor::new();
        let mut release = key(KeyCode::Char('a'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(editor.on_key(release), None);
        assert_eq!(editor.pending(), "");
    }

    #[test]
    fn test_redraw_keeps_pending_input() {
        let prompt = TerminalPrompt::new();
        prompt.set_prompt("DERO Miner>> ");
        prompt.set_pending("sta");

        let mut out = Vec::new();
        prompt.draw_to(&mut out).unwrap();
        let drawn = String::from_utf8(out).unwrap();
        assert!(drawn.ends_with("DERO Miner>> sta"));

        prompt.set_prompt("DERO Miner: Shares 1>> ");
        let mut out = Vec::new();
        prompt.draw_to(&mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().ends_with("Shares 1>> sta"));
    }

    #[test]
    fn test_crlf_writer_expands_newlines() {
        let mut out = CrlfWriter::new(Vec::new());
        write!(out, "one\ntwo\n").unwrap();
        write!(out, "three").unwrap();
        assert_eq!(out.inner, b"one\r\ntwo\r\nthree");
    }
}
