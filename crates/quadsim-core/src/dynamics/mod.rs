//! Rigid-body quadcopter dynamics
//!
//! - [`config`]: per-vehicle physical constants and named presets
//! - [`motors`]: motor mixing, RPM response lag, thrust/torque model
//! - [`rigid_body`]: the authoritative simulation state and per-step update

pub mod config;
pub mod motors;
pub mod rigid_body;

pub use config::*;
pub use motors::*;
pub use rigid_body::*;
