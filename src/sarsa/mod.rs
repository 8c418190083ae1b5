//! Sarsa with linear function approximation
//!
//! The action-value function is approximated as a sum of per-action weights
//! over the active binary features of a state:
//!
//! ```text
//! Q(s, a) = Σ_{i ∈ F(s)} θ[a][i]
//! ```
//!
//! Learning is on-policy TD control: the bootstrap target uses the action the
//! ε-greedy policy actually takes next, and the gradient step is spread evenly
//! over the active features.
//!
//! ## Usage Example
//!
//! ```no_run
//! use mountain_car::sarsa::LinearSarsaLearner;
//!
//! let mut learner = LinearSarsaLearner::new(
//!     405,  // num_features
//!     3,    // num_actions
//!     0.1,  // alpha (step size)
//!     0.1,  // epsilon (exploration)
//!     0.9,  // gamma (discount)
//! )
//! .with_seed(42);
//!
//! let features = vec![0, 81, 162, 243, 324];
//! let action = learner.epsilon_greedy(&features);
//! let next_features = vec![1, 82, 163, 244, 325];
//! let next_action = learner.learning_step(&features, action, -1.0, &next_features);
//! learner.terminal_step(&next_features, next_action, -1.0);
//! ```

pub mod agent;
pub mod weights;

pub use agent::{LinearSarsaLearner, TieBreak};
pub use weights::WeightTable;
