//! Training pipeline abstractions
//!
//! This module provides:
//! - The trial/episode driver loop around the environment, tile coder and learner
//! - Per-episode statistics and the trial-averaged learning curve
//! - Observers for progress, metrics, console output, JSONL export and visualization

pub mod observers;
pub mod training;

// Re-export observer implementations (adapters)
pub use observers::{
    EpisodeLogObserver, EpisodeRecord, JsonlObserver, MetricsObserver, MetricsSummary,
    ProgressObserver, VisualizationObserver,
};
pub use training::{EpisodeAverage, EpisodeStats, TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::{Observer, Visualizer};
