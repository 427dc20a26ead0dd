//! Scripted environment and agent, used for tests.
use crate::{record::Record, Act, Agent, Env, Info, Obs, Policy, Step, Transition};
use anyhow::{anyhow, Result};
use std::sync::{Arc, Mutex};

/// Dummy observation: the number of steps taken so far in the episode.
#[derive(Clone, Debug, PartialEq)]
pub struct DummyObs(pub usize);

impl Obs for DummyObs {
    fn len(&self) -> usize {
        1
    }
}

/// Dummy action.
#[derive(Clone, Debug, PartialEq)]
pub struct DummyAct(pub usize);

impl Act for DummyAct {}

/// Dummy info.
#[derive(Clone, Debug)]
pub struct DummyInfo;

impl Info for DummyInfo {}

/// Counters shared between a [`DummyEnv`] and the test inspecting it.
#[derive(Clone, Debug, Default)]
pub struct DummyProbe(Arc<Mutex<DummyCounts>>);

/// Values counted by [`DummyProbe`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DummyCounts {
    /// Calls of [`Env::reset`].
    pub resets: usize,

    /// Calls of [`Env::close`] that released an open episode.
    pub closes: usize,

    /// Successful calls of [`Env::step`].
    pub steps: usize,
}

impl DummyProbe {
    /// Returns a snapshot of the counters.
    pub fn counts(&self) -> DummyCounts {
        self.0.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn update(&self, f: impl FnOnce(&mut DummyCounts)) {
        if let Ok(mut c) = self.0.lock() {
            f(&mut c)
        }
    }
}

/// Configuration of [`DummyEnv`].
#[derive(Clone, Debug, Default)]
pub struct DummyEnvConfig {
    /// Reward emitted at every step.
    pub reward: f32,

    /// If set, [`Env::step`] fails at this step of every episode (1-based).
    pub fail_at_step: Option<usize>,

    /// Shared counters.
    pub probe: DummyProbe,
}

/// Dummy env.
pub struct DummyEnv {
    config: DummyEnvConfig,
    count_steps: usize,
    is_open: bool,
}

impl Env for DummyEnv {
    type Config = DummyEnvConfig;
    type Act = DummyAct;
    type Obs = DummyObs;
    type Info = DummyInfo;

    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            count_steps: 0,
            is_open: false,
        })
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.close()?;
        self.config.probe.update(|c| c.resets += 1);
        self.count_steps = 0;
        self.is_open = true;
        Ok(DummyObs(0))
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        if !self.is_open {
            return Err(anyhow!("step on a closed environment"));
        }
        self.count_steps += 1;
        if Some(self.count_steps) == self.config.fail_at_step {
            return Err(anyhow!("scripted failure at step {}", self.count_steps));
        }
        self.config.probe.update(|c| c.steps += 1);
        let step = Step::new(
            DummyObs(self.count_steps),
            a.clone(),
            self.config.reward,
            DummyInfo,
        );
        Ok((step, Record::empty()))
    }

    fn close(&mut self) -> Result<()> {
        if self.is_open {
            self.is_open = false;
            self.config.probe.update(|c| c.closes += 1);
        }
        Ok(())
    }
}

/// Dummy agent.
///
/// Always takes action 0, and remembers what the trainer asked of it.
#[derive(Debug, Default)]
pub struct DummyAgent {
    /// Training mode flag.
    pub train: bool,

    /// The number of optimization steps.
    pub n_opts: usize,

    /// Episode indices given to [`Agent::end_episode`].
    pub ended_episodes: Vec<usize>,
}

impl Policy<DummyEnv> for DummyAgent {
    fn sample(&mut self, _obs: &DummyObs) -> DummyAct {
        DummyAct(0)
    }
}

impl Agent<DummyEnv> for DummyAgent {
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn opt_with_record(&mut self, _transition: &Transition<DummyEnv>) -> Record {
        self.n_opts += 1;
        Record::from_scalar("n_opts", self.n_opts as f32)
    }

    fn end_episode(&mut self, episode: usize) -> Record {
        self.ended_episodes.push(episode);
        Record::empty()
    }
}
