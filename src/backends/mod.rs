//! Link backends for `gearbridge`.
//!
//! Implementations of [`LinkOpener`](crate::device::LinkOpener) /
//! [`SerialLink`](crate::device::SerialLink).
//!
//! # Feature flags
//! - **`serial`** — real serial ports through `serialport` (default).
//!
//! [`virtual_input`] is always built; it backs the tests and lets hosts
//! drive the bridge without hardware.

use crate::device::LinkOpener;

#[cfg(feature = "serial")]
#[cfg_attr(docsrs, doc(cfg(feature = "serial")))]
pub mod serial;
pub mod virtual_input;

/// The opener used by [`Bridge::start`](crate::bridge::Bridge::start).
pub fn default_opener() -> Box<dyn LinkOpener> {
    #[cfg(feature = "serial")]
    {
        Box::new(serial::SerialOpener::new())
    }

    #[cfg(not(feature = "serial"))]
    {
        Box::new(no_serial::NoSerial)
    }
}

#[cfg(not(feature = "serial"))]
mod no_serial {
    use crate::device::{LinkOpener, SerialLink};
    use crate::error::{OpenError, OpenStage};
    use std::io;

    /// Every open fails: no serial backend compiled in.
    pub struct NoSerial;

    impl LinkOpener for NoSerial {
        fn open(&mut self, _path: &str, _baud_rate: u32) -> Result<Box<dyn SerialLink>, OpenError> {
            Err(OpenError::new(
                OpenStage::Open,
                io::Error::new(
                    io::ErrorKind::Unsupported,
                    "serial support not compiled in (enable the `serial` feature)",
                ),
            ))
        }
    }
}
