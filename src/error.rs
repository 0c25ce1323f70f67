//! Error types.
//!
//! Three tiers:
//! - [`StartError`] / [`ConfigError`]: the bridge cannot start at all.
//! - [`OpenError`]: one device is unusable for the rest of the session.
//! - read errors stay `std::io::Error` and only end the current drain.

use std::fmt;
use std::io;
use thiserror::Error;

/// Problems loading or validating the device configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read configuration: {0}")]
    Io(#[from] io::Error),

    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported configuration format `{0}` (expected .toml or .json)")]
    UnsupportedFormat(String),

    #[error("no devices configured")]
    NoDevices,
}

/// Fatal startup failure. Nothing is opened or scheduled.
#[derive(Debug, Error)]
pub enum StartError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Individual serial line setting applied after the port is open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigureStep {
    /// Reading or switching the terminal attributes of the opened node.
    TerminalAttributes,
    BaudRate,
    DataBits,
    Parity,
    StopBits,
    FlowControl,
}

impl fmt::Display for ConfigureStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConfigureStep::TerminalAttributes => "get terminal attributes",
            ConfigureStep::BaudRate => "set baud rate",
            ConfigureStep::DataBits => "set data bits",
            ConfigureStep::Parity => "set parity",
            ConfigureStep::StopBits => "set stop bits",
            ConfigureStep::FlowControl => "set flow control",
        })
    }
}

/// Where bringing up a device failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenStage {
    /// The configuration slot is not a device table or has no usable path.
    Path,
    /// The OS refused to open the path.
    Open,
    /// The port opened but a line setting could not be applied.
    Configure(ConfigureStep),
}

impl fmt::Display for OpenStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenStage::Path => f.write_str("read device path"),
            OpenStage::Open => f.write_str("open"),
            OpenStage::Configure(step) => write!(f, "{step}"),
        }
    }
}

/// A single device could not be brought up.
#[derive(Debug, Error)]
#[error("unable to {stage}: {source}")]
pub struct OpenError {
    pub stage: OpenStage,
    #[source]
    pub source: io::Error,
}

impl OpenError {
    pub fn new(stage: OpenStage, source: io::Error) -> Self {
        Self { stage, source }
    }

    pub fn path(msg: &str) -> Self {
        Self::new(OpenStage::Path, io::Error::new(io::ErrorKind::InvalidInput, msg.to_string()))
    }
}
