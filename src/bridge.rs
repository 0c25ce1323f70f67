//! Session context.
//!
//! A [`Bridge`] owns everything one enable/disable cycle needs: the opened
//! devices with their resolved mappings and the polling policy. The host
//! drives it explicitly:
//!
//! ```no_run
//! use gearbridge::{ActionHandle, ActionHost, ActionKind, Bridge, BridgeConfig};
//!
//! struct Sim;
//! impl ActionHost for Sim {
//!     fn resolve(&mut self, _name: &str) -> Option<ActionHandle> { None }
//!     fn invoke(&mut self, _kind: ActionKind, _handle: ActionHandle) {}
//! }
//!
//! let config = BridgeConfig::load("gearbridge.toml").expect("config");
//! let mut sim = Sim;
//! let mut bridge = Bridge::start(&config, &mut sim).expect("start");
//! loop {
//!     let next = bridge.tick(&mut sim);
//!     std::thread::sleep(next);
//! }
//! ```

use crate::action::ActionHost;
use crate::backends::default_opener;
use crate::config::BridgeConfig;
use crate::device::LinkOpener;
use crate::error::{ConfigError, StartError};
use crate::manager::DeviceManager;
use crate::scheduler::{PollScheduler, TickReport};
use std::time::Duration;

pub struct Bridge {
    manager: DeviceManager,
    scheduler: PollScheduler,
    interval: Duration,
    running: bool,
}

impl Bridge {
    /// Open the configured serial devices and resolve their mappings.
    pub fn start<H>(config: &BridgeConfig, host: &mut H) -> Result<Self, StartError>
    where
        H: ActionHost + ?Sized,
    {
        let mut opener = default_opener();
        Self::start_with(config, opener.as_mut(), host)
    }

    /// Like [`Bridge::start`], with a caller-supplied link opener.
    ///
    /// Only a configuration without devices is fatal. Devices that fail to
    /// open are reported and skipped.
    pub fn start_with<H>(
        config: &BridgeConfig,
        opener: &mut dyn LinkOpener,
        host: &mut H,
    ) -> Result<Self, StartError>
    where
        H: ActionHost + ?Sized,
    {
        if config.devices.is_empty() {
            log::warn!("No devices configured.");
            return Err(ConfigError::NoDevices.into());
        }

        let manager = DeviceManager::open_all(&config.devices, opener, host);

        Ok(Self {
            manager,
            scheduler: PollScheduler::new(config.max_consecutive_errors),
            interval: config.poll_interval(),
            running: true,
        })
    }

    /// One scheduled callback. Returns the delay after which the host
    /// should call again.
    pub fn tick<H>(&mut self, host: &mut H) -> Duration
    where
        H: ActionHost + ?Sized,
    {
        let report = self.poll(host);
        if report.lines_read > 0 || report.retired > 0 {
            log::debug!("Tick: {report:?}");
        }
        self.interval
    }

    /// Drain all open devices once and report what happened.
    pub fn poll<H>(&mut self, host: &mut H) -> TickReport
    where
        H: ActionHost + ?Sized,
    {
        if !self.running {
            return TickReport::default();
        }
        self.scheduler.tick(&mut self.manager, host)
    }

    /// Close every device. Further ticks do nothing. Idempotent.
    pub fn stop(&mut self) {
        if self.running {
            self.manager.close_all();
            self.running = false;
            log::info!("Bridge stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn devices(&self) -> &DeviceManager {
        &self.manager
    }

    pub fn device_count(&self) -> usize {
        self.manager.len()
    }

    pub fn open_count(&self) -> usize {
        self.manager.open_count()
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionHandle, ActionKind};
    use crate::backends::virtual_input::VirtualOpener;
    use crate::config::DeviceConfig;

    struct Echo;

    impl ActionHost for Echo {
        fn resolve(&mut self, name: &str) -> Option<ActionHandle> {
            Some(ActionHandle::from_raw(name.len() as u64))
        }

        fn invoke(&mut self, _kind: ActionKind, _handle: ActionHandle) {}
    }

    #[test]
    fn test_empty_config_is_fatal() {
        let err = Bridge::start_with(&BridgeConfig::default(), &mut VirtualOpener::new(), &mut Echo);
        assert!(matches!(
            err,
            Err(StartError::Config(ConfigError::NoDevices))
        ));
    }

    #[test]
    fn test_lifecycle() {
        let mut opener = VirtualOpener::new();
        let remote = opener.add("/dev/a");
        let mut cfg = BridgeConfig::new([DeviceConfig::new("/dev/a").map("A", "x/a")]);
        cfg.poll_interval_ms = 250;

        let mut bridge = Bridge::start_with(&cfg, &mut opener, &mut Echo).unwrap();
        assert!(bridge.is_running());
        assert_eq!(bridge.device_count(), 1);
        assert_eq!(bridge.open_count(), 1);

        remote.feed_line("A");
        assert_eq!(bridge.tick(&mut Echo), Duration::from_millis(250));
        assert_eq!(remote.pending_reads(), 0);

        bridge.stop();
        bridge.stop();
        assert!(!remote.is_open());
        remote.feed_line("A");
        assert_eq!(bridge.poll(&mut Echo), TickReport::default());
        assert_eq!(remote.pending_reads(), 1);
    }

    #[test]
    fn test_drop_closes_devices() {
        let mut opener = VirtualOpener::new();
        let remote = opener.add("/dev/a");
        let cfg = BridgeConfig::new([DeviceConfig::new("/dev/a")]);
        let bridge = Bridge::start_with(&cfg, &mut opener, &mut Echo).unwrap();
        assert!(remote.is_open());
        drop(bridge);
        assert!(!remote.is_open());
    }
}
