//! Flight control
//!
//! - [`pid`]: single-axis PID with anti-windup and derivative filtering
//! - [`cascade`]: nested attitude/rate loops for angle and acro flight modes

pub mod pid;
pub mod cascade;

pub use pid::*;
pub use cascade::*;
