#![warn(missing_docs)]
//! Q-learning agent with a linear action-value function.
//!
//! [`QAgent`] learns online, one [`Transition`](sigrl_core::Transition) at a time,
//! without replay buffer or target network. Actions are chosen ε-greedily with
//! [`EpsilonGreedy`], whose ε is decayed once per episode.
//!
//! The action-value function is any [`QFunction`]; [`LinearQ`] computes
//! `Q = x · W` for an observation vector `x`.
mod linear;
mod model;
mod qlearning;
pub use linear::{LinearQ, LinearQConfig};
pub use model::QFunction;
pub use qlearning::{EpsilonDecay, EpsilonGreedy, QAgent, QAgentConfig};
