//! Configuration of [`SumoEnv`](super::SumoEnv).
use crate::{Connector, QueueThresholds, SumoEnvError};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`SumoEnv`](super::SumoEnv).
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct SumoEnvConfig<C: Connector> {
    /// How to start the simulation at the beginning of an episode.
    pub connector: C::Config,

    /// Identifier of the controlled traffic light.
    pub tls_id: String,

    /// The number of phases the agent chooses from.
    pub n_actions: usize,

    /// The number of monitored lanes, i.e. the dimension of the observation.
    pub n_lanes: usize,

    /// Simulation steps a chosen phase is held before the next decision.
    pub dwell_steps: usize,

    /// Bucket boundaries of queue lengths.
    pub thresholds: QueueThresholds,
}

impl<C: Connector> Clone for SumoEnvConfig<C> {
    fn clone(&self) -> Self {
        Self {
            connector: self.connector.clone(),
            tls_id: self.tls_id.clone(),
            n_actions: self.n_actions,
            n_lanes: self.n_lanes,
            dwell_steps: self.dwell_steps,
            thresholds: self.thresholds.clone(),
        }
    }
}

impl<C: Connector> fmt::Debug for SumoEnvConfig<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SumoEnvConfig")
            .field("connector", &self.connector)
            .field("tls_id", &self.tls_id)
            .field("n_actions", &self.n_actions)
            .field("n_lanes", &self.n_lanes)
            .field("dwell_steps", &self.dwell_steps)
            .field("thresholds", &self.thresholds)
            .finish()
    }
}

impl<C: Connector> Default for SumoEnvConfig<C> {
    fn default() -> Self {
        Self {
            connector: C::Config::default(),
            tls_id: "0".to_string(),
            n_actions: 6,
            n_lanes: 4,
            dwell_steps: 50,
            thresholds: QueueThresholds::default(),
        }
    }
}

impl<C: Connector> SumoEnvConfig<C> {
    /// Sets the configuration of the connector.
    pub fn connector(mut self, v: C::Config) -> Self {
        self.connector = v;
        self
    }

    /// Sets the identifier of the controlled traffic light.
    pub fn tls_id(mut self, v: impl Into<String>) -> Self {
        self.tls_id = v.into();
        self
    }

    /// Sets the number of actions.
    pub fn n_actions(mut self, v: usize) -> Self {
        self.n_actions = v;
        self
    }

    /// Sets the number of monitored lanes.
    pub fn n_lanes(mut self, v: usize) -> Self {
        self.n_lanes = v;
        self
    }

    /// Sets the dwell duration in simulation steps.
    pub fn dwell_steps(mut self, v: usize) -> Self {
        self.dwell_steps = v;
        self
    }

    /// Sets the bucket boundaries.
    pub fn thresholds(mut self, v: QueueThresholds) -> Self {
        self.thresholds = v;
        self
    }

    /// Checks the configuration.
    pub fn validate(&self) -> Result<(), SumoEnvError> {
        if self.n_actions == 0 {
            return Err(SumoEnvError::InvalidConfig("n_actions must be positive".into()));
        }
        if self.n_lanes == 0 {
            return Err(SumoEnvError::InvalidConfig("n_lanes must be positive".into()));
        }
        if !self.thresholds.is_valid() {
            return Err(SumoEnvError::InvalidConfig(format!(
                "thresholds must satisfy low <= high, got {:?}",
                self.thresholds
            )));
        }
        Ok(())
    }

    /// Constructs [`SumoEnvConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`SumoEnvConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
