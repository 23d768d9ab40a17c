//! Normalized pilot input
//!
//! One immutable record per simulation frame, aggregated upstream from
//! whichever physical devices are active. Axis ranges are enforced at
//! construction so a malformed upstream value degrades to a clamped one
//! instead of propagating out of range.

use serde::{Deserialize, Serialize};

/// Origin of a [`NormalizedInput`] sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InputSource {
    #[default]
    Keyboard,
    Gamepad,
    Mouse,
    /// Scripted/replayed input (tutorials, ghost replays)
    Script,
}

/// Pilot intent for one simulation frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedInput {
    /// Collective throttle [0, 1]
    pub throttle: f64,
    /// Roll stick [-1, 1]
    pub roll: f64,
    /// Pitch stick [-1, 1]
    pub pitch: f64,
    /// Yaw stick [-1, 1]
    pub yaw: f64,
    /// Arm / mode toggle
    pub aux1: bool,
    /// Profile slot selector
    pub aux2: i32,
    /// Free auxiliary axis [-1, 1]
    pub aux3: f64,
    /// Sample time [s]
    pub timestamp: f64,
    /// Device that produced this sample
    pub source: InputSource,
}

impl Default for NormalizedInput {
    fn default() -> Self {
        Self {
            throttle: 0.0,
            roll: 0.0,
            pitch: 0.0,
            yaw: 0.0,
            aux1: false,
            aux2: 0,
            aux3: 0.0,
            timestamp: 0.0,
            source: InputSource::default(),
        }
    }
}

impl NormalizedInput {
    /// Build an input sample, clamping every axis into its contract range
    pub fn new(throttle: f64, roll: f64, pitch: f64, yaw: f64) -> Self {
        Self {
            throttle: throttle.clamp(0.0, 1.0),
            roll: roll.clamp(-1.0, 1.0),
            pitch: pitch.clamp(-1.0, 1.0),
            yaw: yaw.clamp(-1.0, 1.0),
            ..Self::default()
        }
    }

    /// Zero-stick sample (throttle cut, sticks centered)
    pub fn idle() -> Self {
        Self::default()
    }
}

/// Apply a deadzone and rescale the remaining range to preserve full scale
///
/// `|stick| < deadzone` maps to 0; beyond it the remaining travel is
/// stretched linearly so full deflection still reaches ±1. The caller
/// guarantees `deadzone < 1` via profile validation.
pub fn apply_deadzone(stick: f64, deadzone: f64) -> f64 {
    let magnitude = stick.abs();
    if magnitude < deadzone {
        return 0.0;
    }
    stick.signum() * (magnitude - deadzone) / (1.0 - deadzone)
}
