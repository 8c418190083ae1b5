//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! the training loop to specific output formats.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    Result,
    pipeline::training::{EpisodeStats, TrainingConfig, TrainingResult},
    ports::{Observer, Visualizer},
    types::CarState,
};

/// One line of the JSONL observation stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    /// Trial number (1-based)
    pub trial: usize,
    /// Episode number within the trial (1-based)
    pub episode: usize,
    pub total_reward: f64,
    pub discounted_reward: f64,
    pub steps: usize,
    pub reached_goal: bool,
}

/// Progress bar observer - Shows training progress across all trials
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    trials: usize,
    goals: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            trials: 0,
            goals: 0,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, config: &TrainingConfig) -> Result<()> {
        let pb = ProgressBar::new((config.trials * config.episodes) as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.trials = config.trials;
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_trial_start(&mut self, trial: usize) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.set_message(format!("trial {}/{} goals:{}", trial + 1, self.trials, self.goals));
        }
        Ok(())
    }

    fn on_episode_end(&mut self, trial: usize, _episode: usize, stats: &EpisodeStats) -> Result<()> {
        if stats.reached_goal {
            self.goals += 1;
        }
        if let Some(pb) = &self.progress_bar {
            pb.inc(1);
            pb.set_message(format!("trial {}/{} goals:{}", trial + 1, self.trials, self.goals));
        }
        Ok(())
    }

    fn on_training_end(&mut self, _result: &TrainingResult) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!("goals:{}", self.goals));
        }
        Ok(())
    }
}

/// Metrics observer - Tracks goal-reach rate and episode lengths
///
/// Counts every episode of every trial and logs a [`MetricsSummary`] when
/// training ends.
pub struct MetricsObserver {
    episodes: usize,
    goals: usize,
    step_counts: Vec<usize>,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self {
            episodes: 0,
            goals: 0,
            step_counts: Vec::new(),
        }
    }

    /// Fraction of episodes that reached the goal
    pub fn goal_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.goals as f64 / self.episodes as f64
        }
    }

    /// Fewest steps taken in any episode
    pub fn best_steps(&self) -> Option<usize> {
        self.step_counts.iter().copied().min()
    }

    /// Average episode length
    pub fn mean_steps(&self) -> f64 {
        if self.step_counts.is_empty() {
            0.0
        } else {
            self.step_counts.iter().sum::<usize>() as f64 / self.step_counts.len() as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            episodes: self.episodes,
            goals: self.goals,
            goal_rate: self.goal_rate(),
            best_steps: self.best_steps(),
            mean_steps: self.mean_steps(),
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub goals: usize,
    pub goal_rate: f64,
    pub best_steps: Option<usize>,
    pub mean_steps: f64,
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for MetricsObserver {
    fn on_episode_end(&mut self, _trial: usize, _episode: usize, stats: &EpisodeStats) -> Result<()> {
        self.episodes += 1;
        self.goals += usize::from(stats.reached_goal);
        self.step_counts.push(stats.steps);
        Ok(())
    }

    fn on_training_end(&mut self, _result: &TrainingResult) -> Result<()> {
        let summary = self.summary();
        info!(
            episodes = summary.episodes,
            goals = summary.goals,
            goal_rate = summary.goal_rate,
            best_steps = ?summary.best_steps,
            mean_steps = summary.mean_steps,
            "episode metrics"
        );
        Ok(())
    }
}

/// Episode log observer - Writes `Episode N: total discounted steps` lines
pub struct EpisodeLogObserver {
    writer: Box<dyn Write + Send>,
}

impl EpisodeLogObserver {
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self { writer }
    }

    /// Log to standard output
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }
}

impl Observer for EpisodeLogObserver {
    fn on_episode_end(&mut self, _trial: usize, episode: usize, stats: &EpisodeStats) -> Result<()> {
        writeln!(
            self.writer,
            "Episode {}: {} {} {}",
            episode + 1,
            stats.total_reward,
            stats.discounted_reward,
            stats.steps
        )?;
        Ok(())
    }

    fn on_training_end(&mut self, _result: &TrainingResult) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// JSONL observer - Exports one record per episode per trial
pub struct JsonlObserver {
    writer: BufWriter<File>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_episode_end(&mut self, trial: usize, episode: usize, stats: &EpisodeStats) -> Result<()> {
        let record = EpisodeRecord {
            trial: trial + 1,
            episode: episode + 1,
            total_reward: stats.total_reward,
            discounted_reward: stats.discounted_reward,
            steps: stats.steps,
            reached_goal: stats.reached_goal,
        };

        // Write as JSONL (one JSON object per line)
        serde_json::to_writer(&mut self.writer, &record)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self, _result: &TrainingResult) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Visualization observer - Drives a [`Visualizer`] on selected episodes
///
/// Episode 1 and every `every`-th episode after it are rendered. A render
/// failure disables the display for the rest of the run instead of aborting
/// training.
pub struct VisualizationObserver {
    visualizer: Box<dyn Visualizer>,
    every: usize,
    active: bool,
    showing: bool,
}

impl VisualizationObserver {
    /// Initialise `visualizer` and wrap it in an observer.
    ///
    /// # Errors
    ///
    /// Propagates the visualizer's `init` failure so the caller can fall back
    /// to running headless.
    pub fn try_new(
        mut visualizer: Box<dyn Visualizer>,
        every: usize,
        initial: &CarState,
    ) -> Result<Self> {
        visualizer.init(initial)?;
        Ok(Self {
            visualizer,
            every: every.max(1),
            active: true,
            showing: false,
        })
    }

    /// Whether `episode` (0-based) is rendered.
    pub fn displays(&self, episode: usize) -> bool {
        episode == 0 || (episode + 1).is_multiple_of(self.every)
    }
}

impl Observer for VisualizationObserver {
    fn on_episode_start(&mut self, _trial: usize, episode: usize) -> Result<()> {
        self.showing = self.active && self.displays(episode);
        Ok(())
    }

    fn on_step(
        &mut self,
        _trial: usize,
        _episode: usize,
        _step: usize,
        state: &CarState,
        _action: usize,
        _reward: f64,
    ) -> Result<()> {
        if !self.showing {
            return Ok(());
        }
        if let Err(e) = self.visualizer.render(state) {
            warn!(
                visualizer = self.visualizer.name(),
                "rendering failed, display disabled: {e}"
            );
            self.active = false;
            self.showing = false;
        }
        Ok(())
    }

    fn on_training_end(&mut self, _result: &TrainingResult) -> Result<()> {
        if let Err(e) = self.visualizer.teardown() {
            warn!(visualizer = self.visualizer.name(), "teardown failed: {e}");
        }
        Ok(())
    }
}
