//! Common test utilities for the mountain car test suite.
//!
//! Provides an observer that records training events into shared storage so
//! tests can inspect them after the pipeline has consumed the observer.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use mountain_car::{
    CarState, Result,
    pipeline::{EpisodeStats, Observer, TrainingConfig, TrainingResult},
};

/// Everything a [`RecordingObserver`] saw
#[derive(Debug, Default)]
pub struct Recording {
    pub training_starts: usize,
    pub training_ends: usize,
    pub trials_started: Vec<usize>,
    pub trials_ended: Vec<usize>,
    pub episodes_started: Vec<(usize, usize)>,
    /// (trial, episode, step, action, reward)
    pub steps: Vec<(usize, usize, usize, usize, f64)>,
    pub states: Vec<CarState>,
    /// (trial, episode, stats)
    pub episodes: Vec<(usize, usize, EpisodeStats)>,
}

impl Recording {
    /// Actions taken in `trial`/`episode`, in order
    pub fn actions(&self, trial: usize, episode: usize) -> Vec<usize> {
        self.steps
            .iter()
            .filter(|s| s.0 == trial && s.1 == episode)
            .map(|s| s.3)
            .collect()
    }

    /// Episode statistics of one trial, in episode order
    pub fn trial_stats(&self, trial: usize) -> Vec<EpisodeStats> {
        self.episodes
            .iter()
            .filter(|e| e.0 == trial)
            .map(|e| e.2)
            .collect()
    }
}

/// Observer writing every event into a shared [`Recording`]
pub struct RecordingObserver {
    inner: Arc<Mutex<Recording>>,
}

impl RecordingObserver {
    pub fn new() -> (Self, Arc<Mutex<Recording>>) {
        let inner = Arc::new(Mutex::new(Recording::default()));
        (
            Self {
                inner: Arc::clone(&inner),
            },
            inner,
        )
    }
}

impl Observer for RecordingObserver {
    fn on_training_start(&mut self, _config: &TrainingConfig) -> Result<()> {
        self.inner.lock().unwrap().training_starts += 1;
        Ok(())
    }

    fn on_trial_start(&mut self, trial: usize) -> Result<()> {
        self.inner.lock().unwrap().trials_started.push(trial);
        Ok(())
    }

    fn on_episode_start(&mut self, trial: usize, episode: usize) -> Result<()> {
        self.inner
            .lock()
            .unwrap()
            .episodes_started
            .push((trial, episode));
        Ok(())
    }

    fn on_step(
        &mut self,
        trial: usize,
        episode: usize,
        step: usize,
        state: &CarState,
        action: usize,
        reward: f64,
    ) -> Result<()> {
        let mut recording = self.inner.lock().unwrap();
        recording.steps.push((trial, episode, step, action, reward));
        recording.states.push(*state);
        Ok(())
    }

    fn on_episode_end(&mut self, trial: usize, episode: usize, stats: &EpisodeStats) -> Result<()> {
        self.inner
            .lock()
            .unwrap()
            .episodes
            .push((trial, episode, *stats));
        Ok(())
    }

    fn on_trial_end(&mut self, trial: usize) -> Result<()> {
        self.inner.lock().unwrap().trials_ended.push(trial);
        Ok(())
    }

    fn on_training_end(&mut self, _result: &TrainingResult) -> Result<()> {
        self.inner.lock().unwrap().training_ends += 1;
        Ok(())
    }
}
