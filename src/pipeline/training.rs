//! Training pipeline: trials of episodes of online Sarsa updates

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::{
    Error, Result,
    mountain_car::MountainCar,
    ports::Observer,
    sarsa::{LinearSarsaLearner, TieBreak},
    tile_coding::TileCoder,
    types::NUM_ACTIONS,
};

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Step size α
    pub alpha: f64,

    /// Exploration rate ε
    pub epsilon: f64,

    /// Discount factor γ
    pub gamma: f64,

    /// Number of independent trials to average over
    pub trials: usize,

    /// Episodes per trial
    pub episodes: usize,

    /// Step cap per episode
    pub max_steps: usize,

    /// Number of overlapping tilings
    pub num_tilings: usize,

    /// Tiles per dimension in each tiling
    pub num_tiles: usize,

    /// Random seed; trial `k` uses `seed + k`
    pub seed: Option<u64>,

    /// How the greedy policy breaks ties
    pub tie_break: TieBreak,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            epsilon: 0.1,
            gamma: 0.9,
            trials: 1,
            episodes: 200,
            max_steps: 2000,
            num_tilings: 5,
            num_tiles: 9,
            seed: None,
            tie_break: TieBreak::Random,
        }
    }
}

impl TrainingConfig {
    /// Check that every parameter is usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first bad parameter.
    pub fn validate(&self) -> Result<()> {
        let counts = [
            ("trials", self.trials),
            ("episodes", self.episodes),
            ("max steps", self.max_steps),
            ("number of tilings", self.num_tilings),
            ("number of tiles", self.num_tiles),
        ];
        if let Some((name, _)) = counts.iter().find(|(_, value)| *value == 0) {
            return Err(Error::config(format!("{name} must be at least 1")));
        }
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(Error::config(format!(
                "alpha must be positive and finite (got {})",
                self.alpha
            )));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(Error::config(format!(
                "epsilon must be in [0, 1] (got {})",
                self.epsilon
            )));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(Error::config(format!(
                "gamma must be in [0, 1] (got {})",
                self.gamma
            )));
        }
        Ok(())
    }

    /// Seed for the learner of `trial`, if runs are seeded.
    pub fn trial_seed(&self, trial: usize) -> Option<u64> {
        self.seed.map(|seed| seed.wrapping_add(trial as u64))
    }
}

/// Totals for a single episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeStats {
    /// Sum of rewards
    pub total_reward: f64,

    /// Sum of rewards discounted by γ per step
    pub discounted_reward: f64,

    /// Transitions taken
    pub steps: usize,

    /// Whether the car reached the goal before the step cap
    pub reached_goal: bool,
}

/// One episode index averaged across trials
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeAverage {
    /// Episode number (1-based)
    pub episode: usize,
    pub total_reward: f64,
    pub discounted_reward: f64,
    pub steps: f64,
    /// Fraction of trials that reached the goal in this episode
    pub goal_rate: f64,
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Number of trials averaged
    pub trials: usize,

    /// Learning curve, one entry per episode index
    pub episodes: Vec<EpisodeAverage>,
}

impl TrainingResult {
    /// Average per-episode sums over `trials`
    fn from_sums(trials: usize, sums: &[EpisodeSums]) -> Self {
        let n = trials.max(1) as f64;
        let episodes = sums
            .iter()
            .enumerate()
            .map(|(i, sum)| EpisodeAverage {
                episode: i + 1,
                total_reward: sum.total_reward / n,
                discounted_reward: sum.discounted_reward / n,
                steps: sum.steps as f64 / n,
                goal_rate: sum.goals as f64 / n,
            })
            .collect();
        Self { trials, episodes }
    }

    /// Last entry of the learning curve
    pub fn final_episode(&self) -> Option<&EpisodeAverage> {
        self.episodes.last()
    }

    /// Fraction of all episodes, over all trials, that reached the goal
    pub fn goal_rate(&self) -> f64 {
        if self.episodes.is_empty() {
            0.0
        } else {
            self.episodes.iter().map(|e| e.goal_rate).sum::<f64>() / self.episodes.len() as f64
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct EpisodeSums {
    total_reward: f64,
    discounted_reward: f64,
    steps: usize,
    goals: usize,
}

impl EpisodeSums {
    fn add(&mut self, stats: &EpisodeStats) {
        self.total_reward += stats.total_reward;
        self.discounted_reward += stats.discounted_reward;
        self.steps += stats.steps;
        self.goals += usize::from(stats.reached_goal);
    }
}

/// Training pipeline for the linear Sarsa learner on Mountain Car
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Run every trial and average the learning curves
    ///
    /// Each trial gets its own tile coder, world and freshly initialised
    /// learner, so trials are independent replications.
    pub fn run(&mut self) -> Result<TrainingResult> {
        self.config.validate()?;
        info!(
            trials = self.config.trials,
            episodes = self.config.episodes,
            max_steps = self.config.max_steps,
            "starting training"
        );

        for observer in &mut self.observers {
            observer.on_training_start(&self.config)?;
        }

        let mut sums = vec![EpisodeSums::default(); self.config.episodes];
        for trial in 0..self.config.trials {
            self.run_trial(trial, &mut sums)?;
        }

        let result = TrainingResult::from_sums(self.config.trials, &sums);

        for observer in &mut self.observers {
            observer.on_training_end(&result)?;
        }

        if let Some(last) = result.final_episode() {
            info!(
                final_steps = last.steps,
                final_total_reward = last.total_reward,
                "training finished"
            );
        }
        Ok(result)
    }

    fn run_trial(&mut self, trial: usize, sums: &mut [EpisodeSums]) -> Result<()> {
        let coder = TileCoder::uniform(
            &MountainCar::ranges(),
            self.config.num_tiles,
            self.config.num_tilings,
        )?;
        let mut learner = self.build_learner(&coder, trial);
        let mut world = MountainCar::new();
        debug!(
            trial,
            num_features = coder.num_features(),
            seed = ?learner.rng_seed(),
            "trial started"
        );

        for observer in &mut self.observers {
            observer.on_trial_start(trial)?;
        }

        for (episode, sum) in sums.iter_mut().enumerate() {
            let stats = self.run_episode(trial, episode, &mut world, &coder, &mut learner)?;
            sum.add(&stats);
        }

        for observer in &mut self.observers {
            observer.on_trial_end(trial)?;
        }
        debug!(trial, "trial finished");
        Ok(())
    }

    fn build_learner(&self, coder: &TileCoder, trial: usize) -> LinearSarsaLearner {
        let learner = LinearSarsaLearner::new(
            coder.num_features(),
            NUM_ACTIONS,
            self.config.alpha,
            self.config.epsilon,
            self.config.gamma,
        )
        .with_tie_break(self.config.tie_break);

        match self.config.trial_seed(trial) {
            Some(seed) => learner.with_seed(seed),
            None => learner,
        }
    }

    fn run_episode(
        &mut self,
        trial: usize,
        episode: usize,
        world: &mut MountainCar,
        coder: &TileCoder,
        learner: &mut LinearSarsaLearner,
    ) -> Result<EpisodeStats> {
        world.reset();
        for observer in &mut self.observers {
            observer.on_episode_start(trial, episode)?;
        }

        let gamma = self.config.gamma;
        let mut features = coder.features(&world.state().as_array())?;
        let mut action = learner.epsilon_greedy(&features);
        let mut reward = world.transition(action)?;
        let mut steps = 1;
        let mut total_reward = reward;
        let mut discount = 1.0;
        let mut discounted_reward = reward;
        self.notify_step(trial, episode, steps, world, action, reward)?;

        while !world.is_terminal() && steps < self.config.max_steps {
            let next_features = coder.features(&world.state().as_array())?;
            action = learner.learning_step(&features, action, reward, &next_features);
            features = next_features;

            reward = world.transition(action)?;
            total_reward += reward;
            discount *= gamma;
            discounted_reward += discount * reward;
            steps += 1;
            self.notify_step(trial, episode, steps, world, action, reward)?;
        }

        let reached_goal = world.is_terminal();
        if reached_goal {
            learner.terminal_step(&features, action, reward);
        } else {
            // Step cap: still learn once from the last transition
            let next_features = coder.features(&world.state().as_array())?;
            learner.learning_step(&features, action, reward, &next_features);
        }

        let stats = EpisodeStats {
            total_reward,
            discounted_reward,
            steps,
            reached_goal,
        };
        for observer in &mut self.observers {
            observer.on_episode_end(trial, episode, &stats)?;
        }
        Ok(stats)
    }

    fn notify_step(
        &mut self,
        trial: usize,
        episode: usize,
        step: usize,
        world: &MountainCar,
        action: usize,
        reward: f64,
    ) -> Result<()> {
        let state = world.state();
        trace!(trial, episode, step, action, reward, %state, "step");
        for observer in &mut self.observers {
            observer.on_step(trial, episode, step, &state, action, reward)?;
        }
        Ok(())
    }
}
