//! CLI infrastructure for the mountain car trainer
//!
//! This module provides the command-line interface for running linear Sarsa
//! experiments and writing their learning curves.

pub mod commands;
pub mod output;
