//! Mountain Car environment
//!
//! An underpowered car sits in a valley between two hills and must rock back
//! and forth to build enough momentum to reach the goal at the right-hand
//! summit. Dynamics are deterministic; every non-terminal step costs `-1`.

pub mod world;

pub use world::{
    GOAL_POSITION, GRAVITY, MAX_POSITION, MAX_VELOCITY, MIN_POSITION, MIN_VELOCITY, MountainCar,
    START_POSITION, THRUST, hill_height,
};
