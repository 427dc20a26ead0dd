//! Linear action-value function.
use crate::QFunction;
use anyhow::{ensure, Result};
use ndarray::{Array1, Array2, Axis};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`LinearQ`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct LinearQConfig {
    /// Dimension of observation vectors.
    pub state_dim: usize,

    /// The number of actions.
    pub n_actions: usize,

    /// Step size of gradient descent.
    pub learning_rate: f32,

    /// Weights are initialized uniformly in `[0, init_scale)`.
    pub init_scale: f32,

    /// Seed of the initialization.
    pub seed: u64,
}

impl Default for LinearQConfig {
    fn default() -> Self {
        Self {
            state_dim: 4,
            n_actions: 6,
            learning_rate: 0.1,
            init_scale: 0.01,
            seed: 42,
        }
    }
}

impl LinearQConfig {
    /// Sets the dimension of observation vectors.
    pub fn state_dim(mut self, v: usize) -> Self {
        self.state_dim = v;
        self
    }

    /// Sets the number of actions.
    pub fn n_actions(mut self, v: usize) -> Self {
        self.n_actions = v;
        self
    }

    /// Sets the learning rate.
    pub fn learning_rate(mut self, v: f32) -> Self {
        self.learning_rate = v;
        self
    }

    /// Sets the seed of the initialization.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Constructs [`LinearQConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`LinearQConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// `Q = x · W`, with `W` of shape `[state_dim, n_actions]`.
///
/// There is no bias and no regularization. Divergence to NaN or infinity is not detected.
#[derive(Debug, Clone)]
pub struct LinearQ {
    w: Array2<f32>,
    learning_rate: f32,
}

impl LinearQ {
    /// Creates the function with given weights.
    pub fn from_weights(w: Array2<f32>, learning_rate: f32) -> Self {
        Self { w, learning_rate }
    }

    /// The weight matrix.
    pub fn weights(&self) -> &Array2<f32> {
        &self.w
    }
}

impl QFunction for LinearQ {
    type Config = LinearQConfig;

    fn build(config: Self::Config) -> Result<Self> {
        ensure!(
            config.state_dim > 0 && config.n_actions > 0,
            "LinearQ needs positive dimensions, got {}x{}",
            config.state_dim,
            config.n_actions
        );
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let scale = config.init_scale;
        let w = Array2::from_shape_fn((config.state_dim, config.n_actions), |_| {
            rng.gen::<f32>() * scale
        });
        Ok(Self::from_weights(w, config.learning_rate))
    }

    fn n_actions(&self) -> usize {
        self.w.ncols()
    }

    fn predict(&self, x: &Array1<f32>) -> Array1<f32> {
        x.dot(&self.w)
    }

    /// The gradient of the loss with respect to `W` is `-2 xᵀ (target - Q)`.
    fn update(&mut self, x: &Array1<f32>, target: &Array1<f32>) -> f32 {
        let err = target - &self.predict(x);
        let loss = err.iter().map(|e| e * e).sum::<f32>();
        let grad = x
            .view()
            .insert_axis(Axis(1))
            .dot(&err.view().insert_axis(Axis(0)));
        self.w.scaled_add(2.0 * self.learning_rate, &grad);
        loss
    }
}
