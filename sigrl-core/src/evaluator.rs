//! Evaluate [`Agent`].
use crate::{record::Record, Agent, Env};
use anyhow::Result;
mod greedy_evaluator;
pub use greedy_evaluator::GreedyEvaluator;

/// Evaluate [`Agent`].
pub trait Evaluator<E: Env> {
    /// Evaluate [`Agent`].
    ///
    /// Implementations run the agent in evaluation mode and never call
    /// [`Agent::opt`]. The training mode of the agent is restored afterwards.
    fn evaluate<A: Agent<E>>(&mut self, agent: &mut A) -> Result<Record>;
}
