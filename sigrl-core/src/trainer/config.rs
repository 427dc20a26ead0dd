//! Configuration of [`Trainer`](super::Trainer).
use crate::error::SigrlError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Trainer`](super::Trainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// The number of training episodes.
    pub n_episodes: usize,

    /// Bound of the step counter of an episode.
    ///
    /// The counter starts at 1 and the episode ends when it reaches
    /// `max_steps_per_episode - 1`, so an episode consists of
    /// `max_steps_per_episode - 1` decisions.
    pub max_steps_per_episode: usize,

    /// Seed given to [`Env::build`](crate::Env::build).
    pub seed: i64,

    /// Interval of writing per-step records, in steps of an episode.
    ///
    /// `usize::MAX` (the default) writes only the per-episode records.
    #[serde(default = "default_record_step_interval")]
    pub record_step_interval: usize,
}

fn default_record_step_interval() -> usize {
    usize::MAX
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            n_episodes: 500,
            max_steps_per_episode: 1000,
            seed: 0,
            record_step_interval: usize::MAX,
        }
    }
}

impl TrainerConfig {
    /// Sets the number of training episodes.
    pub fn n_episodes(mut self, v: usize) -> Self {
        self.n_episodes = v;
        self
    }

    /// Sets the bound of the step counter of an episode.
    pub fn max_steps_per_episode(mut self, v: usize) -> Self {
        self.max_steps_per_episode = v;
        self
    }

    /// Sets the seed of the environment.
    pub fn seed(mut self, v: i64) -> Self {
        self.seed = v;
        self
    }

    /// Sets the interval of writing per-step records.
    pub fn record_step_interval(mut self, v: usize) -> Self {
        self.record_step_interval = v;
        self
    }

    /// Checks the configuration.
    pub fn validate(&self) -> Result<(), SigrlError> {
        if self.max_steps_per_episode < 2 {
            return Err(SigrlError::InvalidConfig(format!(
                "max_steps_per_episode must be at least 2, got {}",
                self.max_steps_per_episode
            )));
        }
        if self.record_step_interval == 0 {
            return Err(SigrlError::InvalidConfig(
                "record_step_interval must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
