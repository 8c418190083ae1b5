//! Mountain Car control with linear Sarsa
//!
//! This crate provides:
//! - The Mountain Car environment with bounded, deterministic dynamics
//! - A tile-coding feature generator over the continuous state space
//! - A linear Sarsa learner with ε-greedy exploration
//! - A trial/episode training pipeline with composable observers
//! - Learning-curve export and an optional text-mode visualizer

pub mod cli;
pub mod error;
pub mod export;
pub mod mountain_car;
pub mod pipeline;
pub mod ports;
pub mod sarsa;
pub mod tile_coding;
pub mod types;
pub mod visualization;

pub use error::{Error, Result};
pub use mountain_car::MountainCar;
pub use pipeline::{TrainingConfig, TrainingPipeline, TrainingResult};
pub use sarsa::{LinearSarsaLearner, TieBreak};
pub use tile_coding::{StateRange, TileCoder};
pub use types::{Action, CarState, NUM_ACTIONS};
