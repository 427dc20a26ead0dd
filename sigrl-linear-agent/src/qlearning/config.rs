//! Configuration of Q-learning agent.
use super::explorer::EpsilonGreedy;
use anyhow::Result;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fmt::Debug,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Constructs [`QAgent`](super::QAgent).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(bound = "QC: DeserializeOwned + Serialize")]
pub struct QAgentConfig<QC>
where
    QC: Clone + Debug + PartialEq + Serialize + DeserializeOwned,
{
    /// Configuration of the action-value function.
    pub model_config: QC,

    /// Discount factor γ of the Bellman target.
    pub discount_factor: f32,

    /// Exploration strategy in training mode.
    pub explorer: EpsilonGreedy,

    /// Seed of the random number generator of the explorer.
    pub seed: u64,
}

impl<QC> Default for QAgentConfig<QC>
where
    QC: Clone + Debug + PartialEq + Serialize + DeserializeOwned + Default,
{
    fn default() -> Self {
        Self {
            model_config: QC::default(),
            discount_factor: 0.99,
            explorer: EpsilonGreedy::default(),
            seed: 42,
        }
    }
}

impl<QC> QAgentConfig<QC>
where
    QC: Clone + Debug + PartialEq + Serialize + DeserializeOwned,
{
    /// Sets the configuration of the action-value function.
    pub fn model_config(mut self, v: QC) -> Self {
        self.model_config = v;
        self
    }

    /// Sets the discount factor.
    pub fn discount_factor(mut self, v: f32) -> Self {
        self.discount_factor = v;
        self
    }

    /// Sets the explorer.
    pub fn explorer(mut self, v: EpsilonGreedy) -> Self {
        self.explorer = v;
        self
    }

    /// Sets the seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Constructs [`QAgentConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`QAgentConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EpsilonDecay, LinearQConfig};
    use tempdir::TempDir;

    #[test]
    fn test_serde_q_agent_config() -> Result<()> {
        let config = QAgentConfig::<LinearQConfig>::default()
            .discount_factor(0.9)
            .explorer(EpsilonGreedy::default().decay(EpsilonDecay::default().integer_division(true)));

        let dir = TempDir::new("q_agent_config")?;
        let path = dir.path().join("q_agent_config.yaml");
        config.save(&path)?;
        let config_ = QAgentConfig::<LinearQConfig>::load(&path)?;

        assert_eq!(config, config_);
        Ok(())
    }
}
