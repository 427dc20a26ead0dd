//! Action-value functions.
use anyhow::Result;
use ndarray::Array1;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

/// A trainable mapping from an observation vector to one value per action.
pub trait QFunction {
    /// Configuration.
    type Config: Clone + Debug + PartialEq + Serialize + DeserializeOwned;

    /// Builds the function with freshly initialized parameters.
    fn build(config: Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// The number of actions.
    fn n_actions(&self) -> usize;

    /// Action values of `x`. Does not change the parameters.
    fn predict(&self, x: &Array1<f32>) -> Array1<f32>;

    /// Performs one gradient-descent step on `Σ (target - predict(x))²`.
    ///
    /// Returns the loss before the step.
    fn update(&mut self, x: &Array1<f32>, target: &Array1<f32>) -> f32;

    /// Action with the largest value; ties are broken by the lowest index.
    fn best_action(&self, x: &Array1<f32>) -> usize {
        argmax(&self.predict(x))
    }
}

/// Index of the largest value, the first one among equals.
pub fn argmax(values: &Array1<f32>) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}
