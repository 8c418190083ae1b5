//! Export functionality for learning results
//!
//! Currently supports the plain-text learning curve: one line per episode
//! with the trial-averaged total reward, discounted reward and step count.

mod learning_curve;

pub use learning_curve::{format_line, write_learning_curve};
