//! Newtype wrappers for the car's action set and state snapshots.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of discrete actions available to the car.
pub const NUM_ACTIONS: usize = 3;

/// A discrete thrust command (0 = reverse, 1 = neutral, 2 = forward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Action(usize);

impl Action {
    pub const REVERSE: Action = Action(0);
    pub const NEUTRAL: Action = Action(1);
    pub const FORWARD: Action = Action(2);

    /// Create a new action, validating it's one of the three thrust commands.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidAction`] if the value is >= 3.
    pub fn new(value: usize) -> Result<Self, crate::Error> {
        if value < NUM_ACTIONS {
            Ok(Action(value))
        } else {
            Err(crate::Error::InvalidAction { action: value })
        }
    }

    /// Thrust direction in `{-1, 0, +1}`.
    pub fn direction(&self) -> f64 {
        self.0 as f64 - 1.0
    }
}

/// Read-only snapshot of the car's position and velocity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarState {
    pub position: f64,
    pub velocity: f64,
}

impl CarState {
    pub fn new(position: f64, velocity: f64) -> Self {
        Self { position, velocity }
    }

    /// State as a point in feature space, `[position, velocity]`.
    pub fn as_array(&self) -> [f64; 2] {
        [self.position, self.velocity]
    }
}

impl fmt::Display for CarState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p: {} v: {}", self.position, self.velocity)
    }
}
