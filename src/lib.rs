//! gearbridge — serial cockpit hardware to simulator commands.
//!
//! Polls line-oriented serial controllers from inside the host's periodic
//! callback, parses their `IDENT` / `IDENT=0|1` lines and drives the mapped
//! host commands with once / begin / end semantics.

pub mod action;
pub mod backends;
pub mod bridge;
pub mod config;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod line;
pub mod logger;
pub mod manager;
pub mod mapping;
pub mod scheduler;

pub use action::*;
pub use bridge::*;
pub use config::*;
pub use device::*;
pub use error::*;
pub use manager::*;
pub use mapping::*;
pub use scheduler::*;
