//! In-memory serial links.
//!
//! A [`VirtualLink`] is a queue of scripted reads. Clones share the queue, so
//! a test or demo keeps one clone to feed, hands an owned clone to the
//! bridge and keeps feeding lines after the bridge took ownership.
//!
//! Each queued chunk is returned by exactly one `read` (split only if the
//! caller's buffer is smaller), the same way a canonical-mode TTY returns one
//! line per read.

use crate::device::{LinkOpener, SerialLink};
use crate::error::{ConfigureStep, OpenError, OpenStage};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct VirtualState {
    reads: VecDeque<io::Result<Vec<u8>>>,
    open: bool,
}

pub struct VirtualLink {
    name: String,
    state: Arc<Mutex<VirtualState>>,
    owned: bool,
}

impl VirtualLink {
    /// A new, not yet opened link.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: Arc::default(),
            owned: false,
        }
    }

    /// Turn this handle into the one the bridge holds. Dropping it closes the link.
    pub fn into_owned(mut self) -> Self {
        self.lock().open = true;
        self.owned = true;
        self
    }

    fn lock(&self) -> MutexGuard<'_, VirtualState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue a line; a `\n` terminator is appended.
    pub fn feed_line(&self, line: &str) {
        let mut bytes = line.as_bytes().to_vec();
        bytes.push(b'\n');
        self.feed_bytes(&bytes);
    }

    /// Queue one raw read.
    pub fn feed_bytes(&self, bytes: &[u8]) {
        self.lock().reads.push_back(Ok(bytes.to_vec()));
    }

    /// Queue a failing read.
    pub fn feed_error(&self, kind: io::ErrorKind) {
        self.lock().reads.push_back(Err(io::Error::from(kind)));
    }

    /// Reads still queued.
    pub fn pending_reads(&self) -> usize {
        self.lock().reads.len()
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }
}

impl Clone for VirtualLink {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            state: Arc::clone(&self.state),
            owned: false,
        }
    }
}

impl Drop for VirtualLink {
    fn drop(&mut self) {
        if self.owned {
            self.lock().open = false;
        }
    }
}

impl SerialLink for VirtualLink {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut state = self.lock();
        match state.reads.pop_front() {
            None => Ok(0),
            Some(Err(e)) => Err(e),
            Some(Ok(bytes)) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                if n < bytes.len() {
                    state.reads.push_front(Ok(bytes[n..].to_vec()));
                }
                Ok(n)
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Opens [`VirtualLink`]s registered by path. Unknown paths fail like a
/// missing device node.
#[derive(Default)]
pub struct VirtualOpener {
    links: HashMap<String, VirtualLink>,
    failing: HashMap<String, ConfigureStep>,
    opened: Vec<(String, u32)>,
}

impl VirtualOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a link at `path` and return a clone that feeds it.
    pub fn add(&mut self, path: &str) -> VirtualLink {
        let link = VirtualLink::new(path);
        self.links.insert(path.to_string(), link.clone());
        link
    }

    /// Make the given configuration step fail for `path`.
    pub fn fail_at(&mut self, path: &str, step: ConfigureStep) {
        self.failing.insert(path.to_string(), step);
    }

    /// `(path, baud_rate)` of every successful open, in order.
    pub fn opened(&self) -> &[(String, u32)] {
        &self.opened
    }
}

impl LinkOpener for VirtualOpener {
    fn open(&mut self, path: &str, baud_rate: u32) -> Result<Box<dyn SerialLink>, OpenError> {
        let link = self.links.get(path).ok_or_else(|| {
            OpenError::new(
                OpenStage::Open,
                io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
            )
        })?;
        let owned = link.clone().into_owned();

        if let Some(step) = self.failing.get(path) {
            drop(owned);
            return Err(OpenError::new(
                OpenStage::Configure(*step),
                io::Error::new(io::ErrorKind::InvalidInput, "Invalid argument"),
            ));
        }

        self.opened.push((path.to_string(), baud_rate));
        Ok(Box::new(owned))
    }
}
