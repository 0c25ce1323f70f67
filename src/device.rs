//! Serial devices.
//!
//! [`SerialLink`] is the only thing the bridge needs from an OS handle: a
//! non-blocking `read`. [`Device`] pairs a link with the routing table of the
//! controller behind it and tracks whether the device is still usable.

use crate::error::OpenError;
use crate::line::{LineReader, ReadOutcome};
use crate::mapping::Mapping;
use std::io;

/// A non-blocking byte source.
///
/// `read` must return immediately: `Ok(0)` when nothing is buffered, an error
/// when the OS reports one. It must never wait for data.
pub trait SerialLink: Send {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
    fn name(&self) -> &str;
}

/// Opens and configures links for device paths.
pub trait LinkOpener {
    /// Open `path` and set it up for `baud_rate`, 8 data bits, no parity, one
    /// stop bit. If a configuration step fails the opened handle must be
    /// closed before returning.
    fn open(&mut self, path: &str, baud_rate: u32) -> Result<Box<dyn SerialLink>, OpenError>;
}

/// A configured controller.
pub struct Device {
    number: usize,
    path: String,
    link: Option<Box<dyn SerialLink>>,
    mapping: Mapping,
    reader: LineReader,
    error_streak: u32,
}

impl Device {
    /// An open device. `number` is 1-based.
    pub fn new(number: usize, path: impl Into<String>, link: Box<dyn SerialLink>, mapping: Mapping) -> Self {
        Self {
            number,
            path: path.into(),
            link: Some(link),
            mapping,
            reader: LineReader::new(),
            error_streak: 0,
        }
    }

    /// A device that failed to come up. It is skipped for the whole session.
    pub fn invalid(number: usize, path: impl Into<String>) -> Self {
        Self {
            number,
            path: path.into(),
            link: None,
            mapping: Mapping::default(),
            reader: LineReader::new(),
            error_streak: 0,
        }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.link.is_some()
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    /// Next line outcome. A closed device always reports [`ReadOutcome::EndOfData`].
    pub fn read_line(&mut self) -> ReadOutcome {
        match self.link.as_deref_mut() {
            Some(link) => {
                let outcome = self.reader.read_line(link);
                #[cfg(feature = "debug-log")]
                if let ReadOutcome::Line(ref line) = outcome {
                    log::trace!("[gearbridge/READ] dev={} line={:?}", self.number, line);
                }
                outcome
            }
            None => ReadOutcome::EndOfData,
        }
    }

    /// Record a drain that ended in a hard error; returns the new streak.
    pub(crate) fn note_error(&mut self) -> u32 {
        self.error_streak += 1;
        self.error_streak
    }

    pub(crate) fn clear_errors(&mut self) {
        self.error_streak = 0;
    }

    /// Drop the OS handle. Idempotent.
    pub fn close(&mut self) {
        if let Some(link) = self.link.take() {
            log::debug!("Device {}: closing {}", self.number, link.name());
        }
        self.reader.reset();
    }
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("number", &self.number)
            .field("path", &self.path)
            .field("open", &self.is_open())
            .field("mapped", &self.mapping.len())
            .finish()
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "device {} ({}, {})",
            self.number,
            self.path,
            if self.is_open() { "open" } else { "invalid" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::virtual_input::VirtualLink;

    #[test]
    fn test_invalid_device_never_reads() {
        let mut dev = Device::invalid(3, "/dev/missing");
        assert!(!dev.is_open());
        assert!(matches!(dev.read_line(), ReadOutcome::EndOfData));
        assert_eq!(dev.to_string(), "device 3 (/dev/missing, invalid)");
    }

    #[test]
    fn test_close_releases_link() {
        let link = VirtualLink::new("v0");
        let remote = link.clone();
        link.feed_line("A=1");

        let mut dev = Device::new(1, "v0", Box::new(link.into_owned()), Mapping::default());
        assert!(remote.is_open());
        assert!(matches!(dev.read_line(), ReadOutcome::Line(ref l) if l == "A=1"));

        dev.close();
        dev.close();
        assert!(!dev.is_open());
        assert!(!remote.is_open());
    }

    #[test]
    fn test_error_streak() {
        let mut dev = Device::invalid(1, "x");
        assert_eq!(dev.note_error(), 1);
        assert_eq!(dev.note_error(), 2);
        dev.clear_errors();
        assert_eq!(dev.note_error(), 1);
    }
}
