//! Runs a learned policy greedily on a single episode.
use super::Evaluator;
use crate::{
    record::{Record, RecordValue},
    Agent, Env, EnvSession,
};
use anyhow::{Context, Result};
use log::{debug, info};

/// Runs the agent for a fixed number of steps with no exploration and no learning.
///
/// The policy is put into evaluation mode, in which [`Policy::sample`] is expected
/// to return the best action. The environment is reset once, so evaluation uses a
/// single connection to the external resource, which is released when the step
/// budget is exhausted or an error occurs.
///
/// The returned [`Record`] holds `"eval_return"` and `"eval_steps"`.
///
/// [`Policy::sample`]: crate::Policy::sample
pub struct GreedyEvaluator<E: Env> {
    /// The number of decisions to make.
    n_steps: usize,

    /// The environment instance used for evaluation.
    env: E,
}

impl<E: Env> GreedyEvaluator<E> {
    /// Constructs a new [`GreedyEvaluator`].
    ///
    /// * `config` - Configuration for the environment
    /// * `seed` - Random seed for environment initialization
    /// * `n_steps` - Step budget of the evaluation
    pub fn new(config: &E::Config, seed: i64, n_steps: usize) -> Result<Self> {
        Ok(Self {
            n_steps,
            env: E::build(config, seed)?,
        })
    }

    fn run<A: Agent<E>>(&mut self, agent: &mut A) -> Result<f32> {
        let (mut session, mut obs) =
            EnvSession::open(&mut self.env).context("Failed to start evaluation")?;
        let mut r_total = 0f32;

        for step in 0..self.n_steps {
            let act = agent.sample(&obs);
            debug!("eval step {}: act = {:?}", step, act);
            let (s, _) = session
                .step(&act)
                .with_context(|| format!("Evaluation failed at step {}", step))?;
            r_total += s.reward;
            obs = s.obs;
        }

        session.close()?;
        Ok(r_total)
    }
}

impl<E: Env> Evaluator<E> for GreedyEvaluator<E> {
    fn evaluate<A: Agent<E>>(&mut self, agent: &mut A) -> Result<Record> {
        let was_train = agent.is_train();
        agent.eval();

        let result = self.run(agent);

        if was_train {
            agent.train();
        }

        let r_total = result?;
        info!("Evaluation: {} steps, return = {}", self.n_steps, r_total);
        Ok(Record::from_slice(&[
            ("eval_return", RecordValue::Scalar(r_total)),
            ("eval_steps", RecordValue::Scalar(self.n_steps as f32)),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::{DummyAgent, DummyEnv, DummyEnvConfig};

    #[test]
    fn test_greedy_evaluation_does_not_learn() -> Result<()> {
        let config = DummyEnvConfig {
            reward: -1.0,
            ..Default::default()
        };
        let probe = config.probe.clone();
        let mut evaluator = GreedyEvaluator::<DummyEnv>::new(&config, 0, 20)?;
        let mut agent = DummyAgent::default();
        agent.train();

        let record = evaluator.evaluate(&mut agent)?;

        assert_eq!(record.get_scalar("eval_return")?, -20.0);
        assert_eq!(record.get_scalar("eval_steps")?, 20.0);
        assert_eq!(agent.n_opts, 0);
        assert!(agent.is_train());
        assert_eq!(probe.counts().resets, 1);
        assert_eq!(probe.counts().closes, 1);
        Ok(())
    }

    #[test]
    fn test_evaluation_releases_env_on_error() -> Result<()> {
        let config = DummyEnvConfig {
            fail_at_step: Some(2),
            ..Default::default()
        };
        let probe = config.probe.clone();
        let mut evaluator = GreedyEvaluator::<DummyEnv>::new(&config, 0, 20)?;
        let mut agent = DummyAgent::default();

        assert!(evaluator.evaluate(&mut agent).is_err());
        assert!(!agent.is_train());
        assert_eq!(probe.counts().closes, 1);
        Ok(())
    }
}
