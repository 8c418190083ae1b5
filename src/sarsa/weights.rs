//! Weight table for linear action-value approximation

use serde::{Deserialize, Serialize};

/// One weight vector per action over a fixed feature space
///
/// Features are binary, so a value estimate only touches the weights of the
/// active indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightTable {
    /// Weights indexed by action, then feature
    theta: Vec<Vec<f64>>,
    num_features: usize,
}

impl WeightTable {
    /// Create a zero-initialised table
    pub fn new(num_actions: usize, num_features: usize) -> Self {
        Self {
            theta: vec![vec![0.0; num_features]; num_actions],
            num_features,
        }
    }

    pub fn num_actions(&self) -> usize {
        self.theta.len()
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Approximate value of `action` given the active `features`
    pub fn q_value(&self, features: &[usize], action: usize) -> f64 {
        let weights = &self.theta[action];
        features.iter().map(|&i| weights[i]).sum()
    }

    /// Add `step` to every active weight of `action`
    pub fn update(&mut self, features: &[usize], action: usize, step: f64) {
        let weights = &mut self.theta[action];
        for &i in features {
            weights[i] += step;
        }
    }

    pub fn weights(&self, action: usize) -> &[f64] {
        &self.theta[action]
    }

    pub fn weights_mut(&mut self, action: usize) -> &mut [f64] {
        &mut self.theta[action]
    }
}
