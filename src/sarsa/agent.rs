//! Linear Sarsa learner
//!
//! Owns the weight table and the policy. A fresh learner (and therefore a
//! fresh zero weight table) is built for every trial.

use clap::ValueEnum;
use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::sarsa::weights::WeightTable;

/// Strategy for choosing among actions with equal estimated value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Pick uniformly at random among the maximising actions
    #[default]
    Random,
    /// Pick the lowest-indexed maximising action
    Lowest,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Sarsa agent with a linear value function over binary features
#[derive(Debug, Clone)]
pub struct LinearSarsaLearner {
    weights: WeightTable,
    alpha: f64,
    epsilon: f64,
    gamma: f64,
    tie_break: TieBreak,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl LinearSarsaLearner {
    /// Create a new learner with all weights at zero
    ///
    /// # Arguments
    ///
    /// * `num_features` - Size of the feature space
    /// * `num_actions` - Number of discrete actions
    /// * `alpha` - Step size, divided among the active features of each update
    /// * `epsilon` - Exploration rate
    /// * `gamma` - Discount factor
    pub fn new(num_features: usize, num_actions: usize, alpha: f64, epsilon: f64, gamma: f64) -> Self {
        Self {
            weights: WeightTable::new(num_actions, num_features),
            alpha,
            epsilon,
            gamma,
            tie_break: TieBreak::default(),
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn num_actions(&self) -> usize {
        self.weights.num_actions()
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    pub fn weights_mut(&mut self) -> &mut WeightTable {
        &mut self.weights
    }

    /// Q(features, action)
    pub fn q_value(&self, features: &[usize], action: usize) -> f64 {
        self.weights.q_value(features, action)
    }

    /// Value estimates for every action, in action order
    pub fn q_values(&self, features: &[usize]) -> Vec<f64> {
        (0..self.num_actions())
            .map(|action| self.q_value(features, action))
            .collect()
    }

    /// ε-greedy action selection
    pub fn epsilon_greedy(&mut self, features: &[usize]) -> usize {
        if self.epsilon > 0.0 && self.rng.random::<f64>() < self.epsilon {
            // Explore: uniform random action
            self.rng.random_range(0..self.num_actions())
        } else {
            self.greedy(features)
        }
    }

    /// Action with the highest estimated value, ties broken per [`TieBreak`]
    pub fn greedy(&mut self, features: &[usize]) -> usize {
        let values = self.q_values(features);
        let best = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let maximising: Vec<usize> = values
            .iter()
            .enumerate()
            .filter(|&(_, &q)| q == best)
            .map(|(action, _)| action)
            .collect();

        match self.tie_break {
            TieBreak::Random => maximising.choose(&mut self.rng).copied().unwrap_or(0),
            TieBreak::Lowest => maximising.first().copied().unwrap_or(0),
        }
    }

    /// Sarsa update for a non-terminal transition
    ///
    /// Chooses the next action with the ε-greedy policy, bootstraps from it,
    /// and returns it so the caller takes exactly that action next.
    ///
    /// δ = r + γ Q(s', a') − Q(s, a)
    pub fn learning_step(
        &mut self,
        old_features: &[usize],
        old_action: usize,
        reward: f64,
        new_features: &[usize],
    ) -> usize {
        let new_action = self.epsilon_greedy(new_features);
        let target = reward + self.gamma * self.q_value(new_features, new_action);
        self.update_toward(old_features, old_action, target);
        new_action
    }

    /// Final update of an episode; the value of a terminal state is zero
    ///
    /// δ = r − Q(s, a)
    pub fn terminal_step(&mut self, features: &[usize], action: usize, reward: f64) {
        self.update_toward(features, action, reward);
    }

    fn update_toward(&mut self, features: &[usize], action: usize, target: f64) {
        if features.is_empty() {
            return;
        }
        let td_error = target - self.q_value(features, action);
        let step = self.alpha / features.len() as f64 * td_error;
        self.weights.update(features, action, step);
    }
}
