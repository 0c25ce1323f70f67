//! Device configuration.
//!
//! The bridge consumes a plain, already-parsed [`BridgeConfig`]. Loading from
//! disk is a convenience on top: TOML or JSON, picked by file extension.
//!
//! ```toml
//! [[devices]]
//! device = "/dev/ttyACM0"
//!
//! [devices.mapping]
//! FLAP_UP = "sim/flight_controls/flaps_up"
//! FLAP_DN = "sim/flight_controls/flaps_down"
//! ```
//!
//! # Tolerance
//! A broken device slot or mapping entry must not take the whole file down:
//! - a slot that is not a table, or whose `device` is not a string, is kept as
//!   [`DeviceSlot::Malformed`] so it still owns its index and is reported when
//!   the devices are opened;
//! - a mapping value that is not a string is kept as [`MappingTarget::Ignored`]
//!   and skipped without a diagnostic.

use crate::error::ConfigError;
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Line speed used when a device does not specify one.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Delay the host is asked to wait between two ticks.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Top-level configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct BridgeConfig {
    /// Device slots, in order. Diagnostics number them from 1.
    #[serde(default)]
    pub devices: Vec<DeviceSlot>,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Retire a device after this many consecutive ticks ended in a hard
    /// read error. `0` keeps every device for the whole session.
    #[serde(default)]
    pub max_consecutive_errors: u32,
}

/// One entry of `devices`.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum DeviceSlot {
    Device(DeviceConfig),
    Malformed(IgnoredAny),
}

/// A serial controller and its input mapping.
#[derive(Clone, Debug, Deserialize)]
pub struct DeviceConfig {
    /// Path of the serial device node.
    #[serde(default)]
    pub device: Option<String>,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Input identifier → host command name.
    #[serde(default)]
    pub mapping: BTreeMap<String, MappingTarget>,
}

/// Right-hand side of a mapping entry.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum MappingTarget {
    Action(String),
    Ignored(IgnoredAny),
}

impl MappingTarget {
    pub fn action_name(&self) -> Option<&str> {
        match self {
            MappingTarget::Action(name) => Some(name),
            MappingTarget::Ignored(_) => None,
        }
    }
}

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

impl DeviceConfig {
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: Some(device.into()),
            baud_rate: DEFAULT_BAUD_RATE,
            mapping: BTreeMap::new(),
        }
    }

    /// Builder-style helper: map `input` to the host command `action`.
    pub fn map(mut self, input: impl Into<String>, action: impl Into<String>) -> Self {
        self.mapping
            .insert(input.into(), MappingTarget::Action(action.into()));
        self
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new(Vec::<DeviceConfig>::new())
    }
}

impl BridgeConfig {
    pub fn new(devices: impl IntoIterator<Item = DeviceConfig>) -> Self {
        Self {
            devices: devices.into_iter().map(DeviceSlot::Device).collect(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_consecutive_errors: 0,
        }
    }

    pub fn from_str_toml(text: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(text)?;
        cfg.validate()
    }

    pub fn from_str_json(text: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(text)?;
        cfg.validate()
    }

    /// Load from a `.toml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let text = std::fs::read_to_string(path)?;
        match ext.as_str() {
            "toml" => Self::from_str_toml(&text),
            "json" => Self::from_str_json(&text),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Rejects configurations the bridge cannot start with.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.devices.is_empty() {
            return Err(ConfigError::NoDevices);
        }
        Ok(self)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
