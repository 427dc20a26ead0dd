#![warn(missing_docs)]
//! Core abstractions for online reinforcement learning against an external simulator.
//!
//! The crate is organised around three traits:
//!
//! * [`Env`] - an environment whose episodes are bound to an external resource
//!   (a simulator connection) that is opened by [`Env::reset`] and released by [`Env::close`].
//! * [`Policy`] - a mapping from observations to actions.
//! * [`Agent`] - a trainable policy that learns from one [`Transition`] at a time.
//!
//! [`Trainer`] drives an [`Agent`] over a fixed number of episodes and collects
//! [`EpisodeStats`], and [`GreedyEvaluator`] runs the learned policy without exploration
//! or learning. Both of them hold the environment through an [`EnvSession`], so the
//! simulator connection is released on every exit path of an episode.
pub mod dummy;
pub mod error;
pub mod record;

mod base;
pub use base::{Act, Agent, Env, EnvSession, Info, Obs, Policy, Step, Transition};

mod evaluator;
pub use evaluator::{Evaluator, GreedyEvaluator};

mod trainer;
pub use trainer::{EpisodeRow, EpisodeStats, Trainer, TrainerConfig};
