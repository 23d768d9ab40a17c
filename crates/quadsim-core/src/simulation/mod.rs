//! Simulation session framework
//!
//! Wires the input, control, and dynamics components into one
//! fixed-substep session a host application can drive frame by frame.

pub mod config;
pub mod session;

pub use config::*;
pub use session::*;
