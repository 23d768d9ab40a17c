//! Mathematical utilities for the flight core
//!
//! Implements quaternion operations, rotation helpers, and the
//! semi-implicit Euler integrator used by the rigid-body engine.

pub mod quaternion;
pub mod rotation;
pub mod integrator;

pub use quaternion::*;
pub use rotation::*;
pub use integrator::*;
