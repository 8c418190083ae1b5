//! Car physics and episode state

use crate::{
    Result,
    tile_coding::StateRange,
    types::{Action, CarState},
};

pub const MIN_POSITION: f64 = -1.2;
pub const MAX_POSITION: f64 = 0.6;
pub const MIN_VELOCITY: f64 = -0.07;
pub const MAX_VELOCITY: f64 = 0.07;
/// The episode ends once the car reaches this position.
pub const GOAL_POSITION: f64 = MAX_POSITION;
pub const START_POSITION: f64 = -0.5;
/// Acceleration contributed by one unit of thrust.
pub const THRUST: f64 = 0.001;
/// Scale of the slope term `cos(3x)`.
pub const GRAVITY: f64 = 0.0025;

/// Height of the hill at `position`, used for rendering.
pub fn hill_height(position: f64) -> f64 {
    (3.0 * position).sin()
}

/// The Mountain Car world
///
/// Owns the car's position and velocity. The state is only changed by
/// [`MountainCar::reset`] and [`MountainCar::transition`], and is kept inside
/// `[MIN_POSITION, MAX_POSITION] × [MIN_VELOCITY, MAX_VELOCITY]`.
#[derive(Debug, Clone)]
pub struct MountainCar {
    position: f64,
    velocity: f64,
}

impl MountainCar {
    /// Create a world with the car at rest at the start position.
    pub fn new() -> Self {
        Self {
            position: START_POSITION,
            velocity: 0.0,
        }
    }

    /// Put the car back at rest at the start position.
    pub fn reset(&mut self) {
        self.position = START_POSITION;
        self.velocity = 0.0;
    }

    /// Apply `action` for one time step and return the reward.
    ///
    /// Position is advanced by the current velocity before the velocity is
    /// updated, so thrust shows up in the position one step later. Once the
    /// goal is reached the world is absorbing: further transitions return `0`
    /// and leave the state alone until [`MountainCar::reset`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidAction`] if `action` is not 0, 1 or 2.
    pub fn transition(&mut self, action: usize) -> Result<f64> {
        let action = Action::new(action)?;

        if self.is_terminal() {
            return Ok(0.0);
        }

        self.position = (self.position + self.velocity).clamp(MIN_POSITION, MAX_POSITION);
        self.velocity = (self.velocity
            + action.direction() * THRUST
            + (3.0 * self.position).cos() * (-GRAVITY))
            .clamp(MIN_VELOCITY, MAX_VELOCITY);

        Ok(-1.0)
    }

    /// Whether the car has reached the goal.
    pub fn is_terminal(&self) -> bool {
        self.position >= GOAL_POSITION
    }

    pub fn state(&self) -> CarState {
        CarState::new(self.position, self.velocity)
    }

    /// Bounds of the state variables, `[position, velocity]`.
    pub fn ranges() -> [StateRange; 2] {
        [
            StateRange::new(MIN_POSITION, MAX_POSITION),
            StateRange::new(MIN_VELOCITY, MAX_VELOCITY),
        ]
    }
}

impl Default for MountainCar {
    fn default() -> Self {
        Self::new()
    }
}
