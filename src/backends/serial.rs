//! Serial ports via `serialport`.
//!
//! Bring-up goes through the same stages a raw `termios` setup does, and
//! diagnostics name the one that failed:
//! 1. open the node (zero timeout, reads never wait)
//! 2. take over the terminal: `serialport` does this inside `open()`, so an
//!    error from there is split by kind. A missing or forbidden node is an
//!    open failure, anything else means the node opened but is not a usable
//!    terminal
//! 3. set baud rate, 8 data bits, no parity, one stop bit, no flow control
//!
//! The port is owned by a local until every step succeeded; an early return
//! drops it, which closes the descriptor.

use crate::device::{LinkOpener, SerialLink};
use crate::error::{ConfigureStep, OpenError, OpenStage};
use serialport::{DataBits, ErrorKind, FlowControl, Parity, SerialPort, StopBits};
use std::io::{self, Read};
use std::time::Duration;

/// A configured serial port.
pub struct SerialPortLink {
    name: String,
    port: Box<dyn SerialPort>,
}

impl SerialLink for SerialPortLink {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.port.bytes_to_read()? == 0 {
            return Ok(0);
        }
        self.port.read(buf)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Opens real serial device nodes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialOpener;

impl SerialOpener {
    pub fn new() -> Self {
        Self
    }
}

/// Stage an error out of `serialport`'s `open()` belongs to.
fn open_stage(kind: ErrorKind) -> OpenStage {
    match kind {
        ErrorKind::NoDevice
        | ErrorKind::Io(io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied) => {
            OpenStage::Open
        }
        _ => OpenStage::Configure(ConfigureStep::TerminalAttributes),
    }
}

fn step(step: ConfigureStep, result: serialport::Result<()>) -> Result<(), OpenError> {
    result.map_err(|e| OpenError::new(OpenStage::Configure(step), e.into()))
}

impl LinkOpener for SerialOpener {
    fn open(&mut self, path: &str, baud_rate: u32) -> Result<Box<dyn SerialLink>, OpenError> {
        let mut port = serialport::new(path, baud_rate)
            .timeout(Duration::ZERO)
            .open()
            .map_err(|e| OpenError::new(open_stage(e.kind()), e.into()))?;

        step(ConfigureStep::BaudRate, port.set_baud_rate(baud_rate))?;
        step(ConfigureStep::DataBits, port.set_data_bits(DataBits::Eight))?;
        step(ConfigureStep::Parity, port.set_parity(Parity::None))?;
        step(ConfigureStep::StopBits, port.set_stop_bits(StopBits::One))?;
        step(ConfigureStep::FlowControl, port.set_flow_control(FlowControl::None))?;

        Ok(Box::new(SerialPortLink {
            name: path.to_string(),
            port,
        }))
    }
}
