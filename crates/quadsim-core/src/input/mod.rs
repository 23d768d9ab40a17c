//! Pilot input processing
//!
//! - [`stick`]: normalized per-frame pilot intent and deadzone handling
//! - [`rates`]: the "Actual Rates" stick-to-rotation-rate curve and
//!   throttle curve, grouped into named profiles

pub mod stick;
pub mod rates;

pub use stick::*;
pub use rates::*;
