//! Exploration strategy of [`QAgent`](super::QAgent).
use crate::model::argmax;
use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Schedule of ε over episodes: `ε = 1 / (episode / episodes_per_unit + offset)`.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpsilonDecay {
    /// Episodes over which the denominator grows by one.
    pub episodes_per_unit: usize,

    /// Denominator at episode 0.
    pub offset: f64,

    /// Truncate `episode / episodes_per_unit` to an integer, giving a staircase.
    pub integer_division: bool,
}

impl Default for EpsilonDecay {
    fn default() -> Self {
        Self {
            episodes_per_unit: 50,
            offset: 10.0,
            integer_division: false,
        }
    }
}

impl EpsilonDecay {
    /// Selects integer or real division.
    pub fn integer_division(mut self, v: bool) -> Self {
        self.integer_division = v;
        self
    }

    /// ε after the episode with index `episode`.
    pub fn eps(&self, episode: usize) -> f64 {
        let per = self.episodes_per_unit.max(1);
        let t = if self.integer_division {
            (episode / per) as f64
        } else {
            episode as f64 / per as f64
        };
        1.0 / (t + self.offset)
    }
}

/// Epsilon-greedy action selection with ε decayed per episode.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpsilonGreedy {
    /// Current ε, the probability of a uniformly random action.
    pub eps: f64,

    /// Decay schedule.
    pub decay: EpsilonDecay,
}

impl Default for EpsilonGreedy {
    fn default() -> Self {
        Self {
            eps: 0.1,
            decay: EpsilonDecay::default(),
        }
    }
}

impl EpsilonGreedy {
    /// Sets the initial ε.
    pub fn eps(mut self, v: f64) -> Self {
        self.eps = v;
        self
    }

    /// Sets the decay schedule.
    pub fn decay(mut self, v: EpsilonDecay) -> Self {
        self.decay = v;
        self
    }

    /// Takes an action based on action values `q`.
    pub fn action(&mut self, q: &Array1<f32>, rng: &mut impl Rng) -> usize {
        if rng.gen::<f64>() < self.eps {
            rng.gen_range(0..q.len())
        } else {
            argmax(q)
        }
    }

    /// Decays ε at the end of episode `episode` and returns the new value.
    pub fn end_episode(&mut self, episode: usize) -> f64 {
        self.eps = self.decay.eps(episode);
        self.eps
    }
}
