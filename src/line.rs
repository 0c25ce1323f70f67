//! Line assembly and classification.
//!
//! Controllers talk in short ASCII lines terminated by `\n` or `\r`. A TTY in
//! canonical mode hands those out one per `read()`; [`LineBuffer`] gives the
//! same one-line-per-call behaviour on top of a raw byte stream so the drain
//! loop does not care which kind of link it is talking to.
//!
//! # Classification
//! - empty line → heartbeat → [`ReadOutcome::Skip`]
//! - first byte not ASCII alphabetic → status noise → [`ReadOutcome::Skip`]
//! - everything else → [`ReadOutcome::Line`]
//!
//! # Long lines
//! At most [`MAX_LINE_LEN`] bytes (terminator included) are ever buffered. If
//! 255 bytes arrive without a terminator they are handed out as one line and
//! the remainder starts a new one. No attempt is made to re-join them.

use crate::device::SerialLink;
use std::io;

/// Size of the line buffer, terminator included.
pub const MAX_LINE_LEN: usize = 256;

/// Usable characters per line.
pub const MAX_LINE_CHARS: usize = MAX_LINE_LEN - 1;

/// Result of one [`LineReader::read_line`] call.
#[derive(Debug)]
pub enum ReadOutcome {
    /// A candidate input line (terminator stripped, starts with a letter).
    Line(String),
    /// Heartbeat, noise or an incomplete line. Keep draining.
    Skip,
    /// Nothing more is available right now.
    EndOfData,
    /// The read failed. Stop draining this device for this tick.
    Error(io::Error),
}

/// `true` for errors that only mean "no data right now".
pub fn is_idle_error(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
    )
}

/// Bounded byte accumulator that yields one terminated line at a time.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self {
            pending: Vec::with_capacity(MAX_LINE_LEN),
        }
    }

    /// Pop the next complete line, without its terminator.
    ///
    /// Exactly one `\n` or `\r` is consumed, so `"A\r\n"` yields `"A"` and
    /// then an empty heartbeat.
    pub fn take_line(&mut self) -> Option<Vec<u8>> {
        if let Some(pos) = self.pending.iter().position(|&b| b == b'\n' || b == b'\r') {
            let mut line: Vec<u8> = self.pending.drain(..=pos).collect();
            line.pop();
            return Some(line);
        }

        if self.pending.len() >= MAX_LINE_CHARS {
            return Some(self.pending.drain(..MAX_LINE_CHARS).collect());
        }

        None
    }

    /// One bounded read from `link` into the pending buffer.
    pub fn fill(&mut self, link: &mut dyn SerialLink) -> io::Result<usize> {
        let mut chunk = [0u8; MAX_LINE_LEN];
        let room = MAX_LINE_LEN.saturating_sub(self.pending.len()).max(1);
        let n = link.read(&mut chunk[..room])?;
        self.pending.extend_from_slice(&chunk[..n]);
        Ok(n)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// Per-device reader: one [`LineBuffer`] plus classification.
#[derive(Debug, Default)]
pub struct LineReader {
    buf: LineBuffer,
}

impl LineReader {
    pub fn new() -> Self {
        Self {
            buf: LineBuffer::new(),
        }
    }

    /// Produce the next outcome for this device, performing at most one read.
    pub fn read_line(&mut self, link: &mut dyn SerialLink) -> ReadOutcome {
        if let Some(line) = self.buf.take_line() {
            return classify(&line);
        }

        match self.buf.fill(link) {
            Ok(0) => ReadOutcome::EndOfData,
            Ok(_) => match self.buf.take_line() {
                Some(line) => classify(&line),
                None => ReadOutcome::Skip,
            },
            Err(e) => ReadOutcome::Error(e),
        }
    }

    pub fn reset(&mut self) {
        self.buf.clear();
    }
}

/// Sort a stripped line into heartbeat / noise / candidate input.
pub fn classify(line: &[u8]) -> ReadOutcome {
    match line.first() {
        None => ReadOutcome::Skip,
        Some(b) if !b.is_ascii_alphabetic() => ReadOutcome::Skip,
        Some(_) => ReadOutcome::Line(String::from_utf8_lossy(line).into_owned()),
    }
}
