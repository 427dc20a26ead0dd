//! Environment.
use super::{Act, Info, Obs, Step};
use crate::record::Record;
use anyhow::Result;

/// Represents an environment backed by an external, stateful resource.
///
/// An episode begins with [`Env::reset`], which acquires the resource (for example,
/// launches a simulator and connects to it), and ends with [`Env::close`], which
/// releases it. The environment itself outlives episodes, so it can be reset again.
///
/// Callers are expected to hold the environment through an
/// [`EnvSession`](crate::EnvSession), which calls [`Env::close`] when the episode
/// ends on any path.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Observation of the environment.
    type Obs: Obs;

    /// Action of the environment.
    type Act: Act;

    /// Information in the [`Step`] object.
    type Info: Info;

    /// Builds an environment with a given random seed.
    ///
    /// No external resource is acquired here.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Starts a new episode and returns the initial observation.
    ///
    /// Any resource left open by a previous episode is released first.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Performes an environment step.
    ///
    /// Errors raised by the external resource are returned unrecovered.
    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)>
    where
        Self: Sized;

    /// Releases the resource acquired by [`Env::reset`].
    ///
    /// Must be a no-op when nothing is open.
    fn close(&mut self) -> Result<()>;
}
