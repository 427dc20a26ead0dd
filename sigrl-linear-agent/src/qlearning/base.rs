//! Q-learning agent.
use super::{config::QAgentConfig, explorer::EpsilonGreedy};
use crate::QFunction;
use anyhow::{ensure, Result};
use log::{debug, info};
use ndarray::Array1;
use rand::{rngs::SmallRng, SeedableRng};
use sigrl_core::{
    record::{Record, RecordValue},
    Agent, Env, Policy, Transition,
};
use std::marker::PhantomData;

/// Online Q-learning agent.
///
/// Every transition gives one update of the action-value function towards the
/// Bellman target: the current prediction for the observation, with the value of
/// the taken action replaced by `r + γ max_a' Q(s', a')`.
pub struct QAgent<E, Q>
where
    E: Env,
    Q: QFunction,
    E::Obs: Into<Array1<f32>>,
    E::Act: From<usize> + Into<usize>,
{
    qfunc: Q,
    discount_factor: f32,
    explorer: EpsilonGreedy,
    train: bool,
    n_opts: usize,
    rng: SmallRng,
    phantom: PhantomData<E>,
}

impl<E, Q> QAgent<E, Q>
where
    E: Env,
    Q: QFunction,
    E::Obs: Into<Array1<f32>>,
    E::Act: From<usize> + Into<usize>,
{
    /// Constructs the agent. The action-value function is freshly initialized.
    pub fn build(config: QAgentConfig<Q::Config>) -> Result<Self> {
        ensure!(
            (0.0..=1.0).contains(&config.discount_factor),
            "discount factor must be in [0, 1], got {}",
            config.discount_factor
        );
        Ok(Self {
            qfunc: Q::build(config.model_config)?,
            discount_factor: config.discount_factor,
            explorer: config.explorer,
            train: false,
            n_opts: 0,
            rng: SmallRng::seed_from_u64(config.seed),
            phantom: PhantomData,
        })
    }

    /// The action-value function.
    pub fn qfunc(&self) -> &Q {
        &self.qfunc
    }

    /// Current exploration rate.
    pub fn eps(&self) -> f64 {
        self.explorer.eps
    }

    /// The number of updates so far.
    pub fn n_opts(&self) -> usize {
        self.n_opts
    }
}

impl<E, Q> Policy<E> for QAgent<E, Q>
where
    E: Env,
    Q: QFunction,
    E::Obs: Into<Array1<f32>>,
    E::Act: From<usize> + Into<usize>,
{
    /// In evaluation mode, always takes the best action.
    fn sample(&mut self, obs: &E::Obs) -> E::Act {
        let x: Array1<f32> = obs.clone().into();
        let a = if self.train {
            let q = self.qfunc.predict(&x);
            self.explorer.action(&q, &mut self.rng)
        } else {
            self.qfunc.best_action(&x)
        };
        a.into()
    }
}

impl<E, Q> Agent<E> for QAgent<E, Q>
where
    E: Env,
    Q: QFunction,
    E::Obs: Into<Array1<f32>>,
    E::Act: From<usize> + Into<usize>,
{
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn opt_with_record(&mut self, transition: &Transition<E>) -> Record {
        let x: Array1<f32> = transition.obs.clone().into();
        let next_x: Array1<f32> = transition.next_obs.clone().into();
        let a: usize = transition.act.clone().into();

        let q_next_max = self
            .qfunc
            .predict(&next_x)
            .iter()
            .cloned()
            .fold(f32::NEG_INFINITY, f32::max);
        let mut target = self.qfunc.predict(&x);
        target[a] = transition.reward + self.discount_factor * q_next_max;

        let loss = self.qfunc.update(&x, &target);
        self.n_opts += 1;
        debug!("act = {}, reward = {}, loss = {}", a, transition.reward, loss);

        Record::from_slice(&[
            ("loss", RecordValue::Scalar(loss)),
            ("target", RecordValue::Scalar(target[a])),
        ])
    }

    fn end_episode(&mut self, episode: usize) -> Record {
        let eps = self.explorer.end_episode(episode);
        info!("episode {}: epsilon = {}", episode, eps);
        Record::from_scalar("epsilon", eps as f32)
    }
}
