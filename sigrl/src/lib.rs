//! Online reinforcement learning of a traffic-signal controller in SUMO.
//!
//! The workspace consists of the following crates:
//!
//! * `sigrl-core` provides the environment and agent traits, the episode loop
//!   ([`Trainer`]), the greedy evaluation ([`GreedyEvaluator`]) and records.
//! * `sigrl-sumo-env` is the signalized intersection ([`SumoEnv`]), driven through
//!   the TraCI protocol or a scripted mock.
//! * `sigrl-linear-agent` is the Q-learning agent with a linear action-value
//!   function ([`QAgent`], [`LinearQ`]).
//!
//! This crate wires them together: [`run`] trains an agent and evaluates it
//! greedily, and the `sigrl` binary adds route generation and the command line.
pub mod config;
use anyhow::{Context, Result};
use log::info;
pub use config::SignalRlConfig;
use sigrl_core::{
    record::{Record, Recorder},
    EpisodeStats, Evaluator as _, GreedyEvaluator, Trainer,
};
use sigrl_linear_agent::{LinearQ, QAgent};
use sigrl_sumo_env::{Connector, SumoEnv, SumoEnvConfig};
use std::{fs::File, path::Path};

/// The agent trained by [`run`].
pub type SignalAgent<C> = QAgent<SumoEnv<C>, LinearQ>;

/// Outcome of [`run`].
#[derive(Debug)]
pub struct Report {
    /// Statistics of the training episodes.
    pub stats: EpisodeStats,

    /// Record of the greedy evaluation.
    pub eval: Record,
}

/// Builds the agent described by `config`.
pub fn build_agent<C: Connector>(config: &SignalRlConfig<C>) -> Result<SignalAgent<C>> {
    SignalAgent::<C>::build(config.agent.clone())
}

/// Trains `agent`, then runs it greedily on `eval_env`.
///
/// Each training episode and the evaluation get their own simulation.
pub fn run<C: Connector>(
    config: &SignalRlConfig<C>,
    eval_env: &SumoEnvConfig<C>,
    agent: &mut SignalAgent<C>,
    recorder: &mut dyn Recorder,
) -> Result<Report> {
    config.validate()?;
    let mut trainer = Trainer::<SumoEnv<C>>::build(config.trainer.clone(), config.env.clone())?;
    let stats = trainer.train(agent, recorder).context("Training failed")?;
    if let Some(mean) = stats.mean_return_of_last(50) {
        info!("Mean return of the last 50 episodes: {}", mean);
    }

    let mut evaluator = GreedyEvaluator::<SumoEnv<C>>::new(
        eval_env,
        config.trainer.seed,
        config.eval_steps,
    )?;
    let eval = evaluator.evaluate(agent).context("Evaluation failed")?;
    Ok(Report { stats, eval })
}

/// Writes one row per episode: `episode,steps,return`.
pub fn write_stats_csv(stats: &EpisodeStats, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = csv::Writer::from_writer(
        File::create(path).with_context(|| format!("Failed to create {:?}", path))?,
    );
    for row in stats.rows() {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    info!("Wrote episode statistics to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_write_stats_csv() -> Result<()> {
        let mut stats = EpisodeStats::default();
        stats.push(999, 3.0);
        stats.push(999, -1.5);

        let dir = TempDir::new("stats")?;
        let path = dir.path().join("stats.csv");
        write_stats_csv(&stats, &path)?;

        let text = std::fs::read_to_string(&path)?;
        assert_eq!(text, "episode,steps,return\n0,999,3.0\n1,999,-1.5\n");
        Ok(())
    }
}
