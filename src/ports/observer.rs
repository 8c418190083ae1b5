//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing training events,
//! allowing composable data collection without coupling the training loop
//! to specific output formats or displays.

use crate::{
    Result,
    pipeline::{EpisodeStats, TrainingConfig, TrainingResult},
    types::CarState,
};

/// Observer trait for monitoring training
///
/// Observers can be composed to collect different types of data during
/// training: progress bars, per-episode console lines, JSONL export, or a
/// live rendering of the car.
///
/// # Event Sequence
///
/// The observer methods are called in the following order:
/// 1. `on_training_start(config)` - Once at the beginning
/// 2. For each trial:
///    - `on_trial_start(trial)`
///    - For each episode:
///      - `on_episode_start(trial, episode)`
///      - `on_step(...)` - After every environment transition
///      - `on_episode_end(trial, episode, stats)`
///    - `on_trial_end(trial)`
/// 3. `on_training_end(result)` - Once at the end
///
/// Trial and episode indices are 0-based.
///
/// # Examples
///
/// ```no_run
/// use mountain_car::{pipeline::EpisodeStats, ports::Observer};
///
/// struct GoalCounter {
///     goals: usize,
/// }
///
/// impl Observer for GoalCounter {
///     fn on_episode_end(
///         &mut self,
///         _trial: usize,
///         _episode: usize,
///         stats: &EpisodeStats,
///     ) -> mountain_car::Result<()> {
///         if stats.reached_goal {
///             self.goals += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts.
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to initialize observation state.
    fn on_training_start(&mut self, _config: &TrainingConfig) -> Result<()> {
        Ok(())
    }

    /// Called when a trial starts, after its learner has been built.
    fn on_trial_start(&mut self, _trial: usize) -> Result<()> {
        Ok(())
    }

    /// Called when an episode starts, after the world has been reset.
    fn on_episode_start(&mut self, _trial: usize, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each environment transition.
    ///
    /// # Parameters
    ///
    /// * `step` - Number of transitions taken so far in this episode (1-based)
    /// * `state` - State of the car after the transition
    /// * `action` - Action that produced the transition
    /// * `reward` - Reward returned by the transition
    fn on_step(
        &mut self,
        _trial: usize,
        _episode: usize,
        _step: usize,
        _state: &CarState,
        _action: usize,
        _reward: f64,
    ) -> Result<()> {
        Ok(())
    }

    /// Called when an episode ends, after the final learning update.
    fn on_episode_end(&mut self, _trial: usize, _episode: usize, _stats: &EpisodeStats) -> Result<()> {
        Ok(())
    }

    /// Called when a trial completes.
    fn on_trial_end(&mut self, _trial: usize) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    ///
    /// This is the last method called in the observation lifecycle.
    /// Use this to finalize outputs, close files, or release displays.
    fn on_training_end(&mut self, _result: &TrainingResult) -> Result<()> {
        Ok(())
    }
}
