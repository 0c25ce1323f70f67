//! The per-tick drain.
//!
//! Every tick visits each open device and keeps reading until it reports
//! no more data or an error, so lines never pile up across ticks. Invalid
//! devices are skipped. Nothing carries over between ticks except the
//! device's own open flag and error streak.

use crate::action::ActionHost;
use crate::device::Device;
use crate::dispatch::dispatch;
use crate::line::{is_idle_error, ReadOutcome};
use crate::manager::DeviceManager;

/// Counters for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Open devices visited.
    pub devices_polled: usize,
    /// Candidate input lines read.
    pub lines_read: usize,
    /// Host calls made.
    pub dispatched: usize,
    /// Heartbeats, noise and partial reads.
    pub skipped: usize,
    /// Lines with an unknown value or an unmapped identifier.
    pub dropped: usize,
    /// Devices retired this tick after repeated hard errors.
    pub retired: usize,
}

impl TickReport {
    fn absorb(&mut self, other: TickReport) {
        self.devices_polled += other.devices_polled;
        self.lines_read += other.lines_read;
        self.dispatched += other.dispatched;
        self.skipped += other.skipped;
        self.dropped += other.dropped;
        self.retired += other.retired;
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PollScheduler {
    max_consecutive_errors: u32,
}

impl PollScheduler {
    /// `max_consecutive_errors == 0` never retires a device.
    pub fn new(max_consecutive_errors: u32) -> Self {
        Self {
            max_consecutive_errors,
        }
    }

    /// Drain every open device once.
    pub fn tick<H>(&self, manager: &mut DeviceManager, host: &mut H) -> TickReport
    where
        H: ActionHost + ?Sized,
    {
        let mut report = TickReport::default();
        for device in manager.devices_mut().iter_mut().filter(|d| d.is_open()) {
            report.absorb(self.drain(device, host));
        }
        report
    }

    /// Read and dispatch until `device` has nothing more to give this tick.
    pub fn drain<H>(&self, device: &mut Device, host: &mut H) -> TickReport
    where
        H: ActionHost + ?Sized,
    {
        let mut report = TickReport {
            devices_polled: 1,
            ..TickReport::default()
        };

        loop {
            match device.read_line() {
                ReadOutcome::Line(line) => {
                    report.lines_read += 1;
                    match dispatch(&line, device.mapping(), host) {
                        Ok(_) => report.dispatched += 1,
                        Err(_) => report.dropped += 1,
                    }
                }
                ReadOutcome::Skip => report.skipped += 1,
                ReadOutcome::EndOfData => {
                    device.clear_errors();
                    break;
                }
                ReadOutcome::Error(err) => {
                    if is_idle_error(&err) {
                        device.clear_errors();
                    } else {
                        let streak = device.note_error();
                        log::debug!("Device {}: read failed ({streak} in a row): {err}", device.number());
                        if self.max_consecutive_errors > 0 && streak >= self.max_consecutive_errors {
                            log::warn!(
                                "Device {}: giving up on {} after {streak} failed reads: {err}",
                                device.number(),
                                device.path()
                            );
                            device.close();
                            report.retired += 1;
                        }
                    }
                    break;
                }
            }
        }

        report
    }
}
