//! Online Q-learning agent.
mod base;
mod config;
mod explorer;
pub use base::QAgent;
pub use config::QAgentConfig;
pub use explorer::{EpsilonDecay, EpsilonGreedy};
