//! Train [`Agent`].
mod config;
mod stats;
use crate::{
    record::{Record, RecordValue, Recorder},
    Agent, Env, EnvSession, Transition,
};
use anyhow::{Context, Result};
pub use config::TrainerConfig;
use log::{debug, info};
pub use stats::{EpisodeRow, EpisodeStats};

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages the episode loop of online training.
///
/// # Training loop
///
/// 0. Given an agent implementing [`Agent`] and a recorder implementing [`Recorder`],
///    build the environment once. The environment lives for the whole run; only its
///    external resource is episode-scoped.
/// 1. For each episode `i` in `0..n_episodes`:
///     1. Open an [`EnvSession`], which resets the environment and yields the initial
///        observation `o`.
///     2. For `step` in `1..=max_steps_per_episode - 1`:
///         * `a = agent.sample(o)`, which explores in training mode.
///         * `(o', r) = env.step(a)`.
///         * `agent.opt((o, a, o', r))`; the transition is dropped afterwards.
///         * Every `record_step_interval` steps, write the record of the step, i.e. the
///           environment's record merged with the agent's, to the recorder.
///         * Accumulate `r`, then `o = o'`.
///         * At the final step, call `agent.end_episode(i)`.
///     3. Close the session, push the step count and the cumulative reward to
///        [`EpisodeStats`] and write a record of the episode to the recorder.
///
/// An error at any point ends training and is returned; the session releases the
/// environment before that.
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     A[Agent]-->|Env::Act|B[Env]
///     B -->|Env::Obs|A
///     B -->|"Step&lt;E: Env&gt;"|C[Transition]
///     C -->|opt|A
/// ```
pub struct Trainer<E: Env> {
    /// Configuration of the environment for training.
    env_config: E::Config,

    /// The number of training episodes.
    n_episodes: usize,

    /// Bound of the step counter of an episode.
    max_steps_per_episode: usize,

    /// Seed of the environment.
    seed: i64,

    /// Interval of writing per-step records.
    record_step_interval: usize,
}

impl<E: Env> Trainer<E> {
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig, env_config: E::Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            env_config,
            n_episodes: config.n_episodes,
            max_steps_per_episode: config.max_steps_per_episode,
            seed: config.seed,
            record_step_interval: config.record_step_interval,
        })
    }

    /// Runs one training episode on `env`.
    ///
    /// Returns the number of steps, the cumulative reward and a record of the episode.
    /// Per-step records are written to `recorder`.
    pub fn run_episode<A: Agent<E>>(
        &self,
        env: &mut E,
        agent: &mut A,
        episode: usize,
        recorder: &mut dyn Recorder,
    ) -> Result<(usize, f32, Record)> {
        let (mut session, mut obs) = EnvSession::open(env)
            .with_context(|| format!("Failed to start episode {}", episode))?;
        let last_step = self.max_steps_per_episode - 1;
        let mut r_total = 0f32;
        let mut count_steps = 0;
        let mut record = Record::empty();

        for step in 1..=last_step {
            let act = agent.sample(&obs);
            let (s, record_env) = session
                .step(&act)
                .with_context(|| format!("Episode {} failed at step {}", episode, step))?;
            let transition = Transition::from_step(obs, s);
            if step % self.record_step_interval == 0 {
                let mut record_step = record_env.merge(agent.opt_with_record(&transition));
                record_step.insert("episode", RecordValue::Scalar(episode as _));
                record_step.insert("step", RecordValue::Scalar(step as _));
                recorder.write(record_step);
            } else {
                agent.opt(&transition);
            }
            debug!(
                "episode {} step {}: act = {:?}, reward = {}",
                episode, step, transition.act, transition.reward
            );

            r_total += transition.reward;
            obs = transition.next_obs;
            count_steps = step;

            if step == last_step {
                record.merge_inplace(agent.end_episode(episode));
            }
        }

        session.close()?;

        record.insert("episode", RecordValue::Scalar(episode as _));
        record.insert("steps", RecordValue::Scalar(count_steps as _));
        record.insert("return", RecordValue::Scalar(r_total));
        Ok((count_steps, r_total, record))
    }

    /// Train the agent.
    ///
    /// The agent's parameters carry over from episode to episode; everything else,
    /// including the environment's external resource, is reset per episode.
    pub fn train<A: Agent<E>>(
        &mut self,
        agent: &mut A,
        recorder: &mut dyn Recorder,
    ) -> Result<EpisodeStats> {
        let mut env = E::build(&self.env_config, self.seed)?;
        let mut stats = EpisodeStats::default();
        agent.train();

        for episode in 0..self.n_episodes {
            let (steps, r_total, record) = self.run_episode(&mut env, agent, episode, recorder)?;
            info!(
                "Episode {}: {} steps, return = {}",
                episode, steps, r_total
            );
            stats.push(steps, r_total);
            recorder.write(record);
        }

        recorder.flush();
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dummy::{DummyAgent, DummyEnv, DummyEnvConfig},
        record::BufferedRecorder,
    };

    #[test]
    fn test_episode_steps_and_return() -> Result<()> {
        let env_config = DummyEnvConfig {
            reward: 0.5,
            ..Default::default()
        };
        let probe = env_config.probe.clone();
        let config = TrainerConfig::default()
            .n_episodes(3)
            .max_steps_per_episode(10);
        let mut trainer = Trainer::<DummyEnv>::build(config, env_config)?;
        let mut agent = DummyAgent::default();
        let mut recorder = BufferedRecorder::new();

        let stats = trainer.train(&mut agent, &mut recorder)?;

        assert_eq!(stats.steps(), &[9, 9, 9]);
        assert_eq!(stats.returns(), &[4.5, 4.5, 4.5]);
        assert_eq!(agent.n_opts, 27);
        assert_eq!(agent.ended_episodes, vec![0, 1, 2]);
        assert!(agent.is_train());
        assert_eq!(recorder.len(), 3);

        let counts = probe.counts();
        assert_eq!(counts.resets, 3);
        assert_eq!(counts.closes, 3);
        assert_eq!(counts.steps, 27);
        Ok(())
    }

    #[test]
    fn test_step_records_written_at_interval() -> Result<()> {
        let config = TrainerConfig::default()
            .n_episodes(2)
            .max_steps_per_episode(10)
            .record_step_interval(3);
        let mut trainer = Trainer::<DummyEnv>::build(config, DummyEnvConfig::default())?;
        let mut agent = DummyAgent::default();
        let mut recorder = BufferedRecorder::new();

        trainer.train(&mut agent, &mut recorder)?;

        // Steps 3, 6 and 9 of each episode, then the episode record.
        assert_eq!(recorder.len(), 2 * (3 + 1));
        let steps: Vec<f32> = recorder
            .iter()
            .filter_map(|r| r.get_scalar("step").ok())
            .collect();
        assert_eq!(steps, vec![3.0, 6.0, 9.0, 3.0, 6.0, 9.0]);
        let n_opts: Vec<f32> = recorder
            .iter()
            .filter_map(|r| r.get_scalar("n_opts").ok())
            .collect();
        assert_eq!(n_opts, vec![3.0, 6.0, 9.0, 12.0, 15.0, 18.0]);
        assert_eq!(agent.n_opts, 18);
        Ok(())
    }

    #[test]
    fn test_session_released_on_step_error() -> Result<()> {
        let env_config = DummyEnvConfig {
            fail_at_step: Some(4),
            ..Default::default()
        };
        let probe = env_config.probe.clone();
        let config = TrainerConfig::default()
            .n_episodes(2)
            .max_steps_per_episode(10);
        let mut trainer = Trainer::<DummyEnv>::build(config, env_config)?;
        let mut agent = DummyAgent::default();

        let result = trainer.train(&mut agent, &mut BufferedRecorder::new());

        assert!(result.is_err());
        assert_eq!(agent.n_opts, 3);
        assert!(agent.ended_episodes.is_empty());
        let counts = probe.counts();
        assert_eq!(counts.resets, 1);
        assert_eq!(counts.closes, 1);
        Ok(())
    }

    #[test]
    fn test_build_rejects_short_episodes() {
        let config = TrainerConfig::default().max_steps_per_episode(1);
        assert!(Trainer::<DummyEnv>::build(config, DummyEnvConfig::default()).is_err());
    }
}
