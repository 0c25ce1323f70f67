use crate::action::ActionHost;
use crate::config::DeviceSlot;
use crate::device::{Device, LinkOpener};
use crate::error::OpenError;
use crate::mapping::Mapping;

/// Owns every configured device for the session.
///
/// Devices keep their configured position: a device that failed to come up
/// stays in the list as invalid, so numbering in diagnostics is stable.
#[derive(Debug, Default)]
pub struct DeviceManager {
    devices: Vec<Device>,
}

impl DeviceManager {
    pub fn new() -> Self {
        Self { devices: vec![] }
    }

    /// Open every configured slot and build its mapping.
    ///
    /// A failing slot is logged with its 1-based number and the stage that
    /// failed, then kept as an invalid device. The mapping of a device is only
    /// resolved once its link is up.
    pub fn open_all<H>(slots: &[DeviceSlot], opener: &mut dyn LinkOpener, host: &mut H) -> Self
    where
        H: ActionHost + ?Sized,
    {
        let mut manager = Self::new();

        for (i, slot) in slots.iter().enumerate() {
            let number = i + 1;
            match open_slot(number, slot, opener, host) {
                Ok(device) => manager.devices.push(device),
                Err((path, err)) => {
                    match path.as_deref() {
                        Some(path) => log::warn!("Device {number}: {path}: {err}"),
                        None => log::warn!("Device {number}: {err}"),
                    }
                    manager
                        .devices
                        .push(Device::invalid(number, path.unwrap_or_default()));
                }
            }
        }

        log::info!(
            "Opened {} of {} configured device(s)",
            manager.open_count(),
            manager.len()
        );
        manager
    }

    pub fn add_device(&mut self, device: Device) {
        self.devices.push(device);
    }

    /// Close every open device. Safe to call repeatedly.
    pub fn close_all(&mut self) {
        for device in self.devices.iter_mut().filter(|d| d.is_open()) {
            device.close();
        }
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn devices_mut(&mut self) -> &mut [Device] {
        &mut self.devices
    }

    /// Devices that are still usable.
    pub fn open_devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter().filter(|d| d.is_open())
    }

    pub fn open_count(&self) -> usize {
        self.open_devices().count()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

fn open_slot<H>(
    number: usize,
    slot: &DeviceSlot,
    opener: &mut dyn LinkOpener,
    host: &mut H,
) -> Result<Device, (Option<String>, OpenError)>
where
    H: ActionHost + ?Sized,
{
    let config = match slot {
        DeviceSlot::Device(config) => config,
        DeviceSlot::Malformed(_) => {
            return Err((None, OpenError::path("invalid entry, a table with a `device` string was expected")));
        }
    };
    let Some(path) = config.device.as_deref() else {
        return Err((None, OpenError::path("invalid device path, a string was expected")));
    };

    let link = opener
        .open(path, config.baud_rate)
        .map_err(|e| (Some(path.to_string()), e))?;
    let mapping = Mapping::build(number, &config.mapping, host);
    log::debug!(
        "Device {number}: {path} open at {} baud, {} of {} input(s) mapped",
        config.baud_rate,
        mapping.len(),
        config.mapping.len()
    );

    Ok(Device::new(number, path, link, mapping))
}
