//! Ports (trait boundaries) for external collaborators.
//!
//! The training loop only talks to the outside world through these traits:
//! observers receive training events, and a visualizer (if any) draws the car.
//! Neither is required for learning to proceed.

pub mod observer;
pub mod visualizer;

pub use observer::Observer;
pub use visualizer::Visualizer;
