//! Configuration of a training run.
use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use sigrl_core::TrainerConfig;
use sigrl_linear_agent::{LinearQConfig, QAgentConfig};
use sigrl_sumo_env::{Connector, RouteGenerator, SumoEnvConfig};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::{Path, PathBuf},
};

/// Everything a run needs, in one YAML document.
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct SignalRlConfig<C: Connector> {
    /// Episode loop.
    pub trainer: TrainerConfig,

    /// Environment used for training. Evaluation uses a copy with its own front-end.
    pub env: SumoEnvConfig<C>,

    /// Q-learning agent.
    pub agent: QAgentConfig<LinearQConfig>,

    /// Traffic demand written before training.
    pub routes: RouteGenerator,

    /// Route file referenced by the SUMO configuration.
    pub route_file: PathBuf,

    /// Decisions made in the greedy evaluation.
    pub eval_steps: usize,
}

impl<C: Connector> Clone for SignalRlConfig<C> {
    fn clone(&self) -> Self {
        Self {
            trainer: self.trainer.clone(),
            env: self.env.clone(),
            agent: self.agent.clone(),
            routes: self.routes.clone(),
            route_file: self.route_file.clone(),
            eval_steps: self.eval_steps,
        }
    }
}

impl<C: Connector> Default for SignalRlConfig<C> {
    fn default() -> Self {
        Self {
            trainer: TrainerConfig::default(),
            env: SumoEnvConfig::default(),
            agent: QAgentConfig::default(),
            routes: RouteGenerator::default(),
            route_file: PathBuf::from("data/cross.rou.xml"),
            eval_steps: 1000,
        }
    }
}

impl<C: Connector> SignalRlConfig<C> {
    /// Checks the parts of the configuration against each other.
    pub fn validate(&self) -> Result<()> {
        self.trainer.validate()?;
        self.env.validate()?;
        let model = &self.agent.model_config;
        ensure!(
            model.state_dim == self.env.n_lanes,
            "state_dim of the model ({}) differs from n_lanes of the environment ({})",
            model.state_dim,
            self.env.n_lanes
        );
        ensure!(
            model.n_actions == self.env.n_actions,
            "n_actions of the model ({}) differs from n_actions of the environment ({})",
            model.n_actions,
            self.env.n_actions
        );
        Ok(())
    }

    /// Constructs [`SignalRlConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`SignalRlConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigrl_sumo_env::{mock::MockConnector, TraciConnector};
    use tempdir::TempDir;

    #[test]
    fn test_default_is_consistent() {
        assert!(SignalRlConfig::<TraciConnector>::default().validate().is_ok());
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut config = SignalRlConfig::<MockConnector>::default();
        config.env = config.env.n_lanes(8);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serde_signal_rl_config() -> Result<()> {
        let mut config = SignalRlConfig::<TraciConnector>::default();
        config.trainer = config.trainer.n_episodes(20);
        config.eval_steps = 10;

        let dir = TempDir::new("signal_rl_config")?;
        let path = dir.path().join("config.yaml");
        config.save(&path)?;
        let config_ = SignalRlConfig::<TraciConnector>::load(&path)?;

        assert_eq!(config_.trainer, config.trainer);
        assert_eq!(config_.agent, config.agent);
        assert_eq!(config_.env.connector, config.env.connector);
        assert_eq!(config_.routes, config.routes);
        assert_eq!(config_.eval_steps, 10);
        Ok(())
    }
}
