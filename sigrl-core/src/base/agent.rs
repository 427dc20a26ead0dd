//! Agent.
use super::{Env, Policy, Transition};
use crate::record::Record;

/// Represents a trainable policy on an environment.
///
/// The agent learns online: every transition is used for exactly one
/// optimization step and then discarded.
pub trait Agent<E: Env>: Policy<E> {
    /// Set the policy to training mode.
    fn train(&mut self);

    /// Set the policy to evaluation mode.
    ///
    /// In evaluation mode the policy must act greedily.
    fn eval(&mut self);

    /// Return if it is in training mode.
    fn is_train(&self) -> bool;

    /// Performs an optimization step with the given transition.
    fn opt(&mut self, transition: &Transition<E>) {
        let _ = self.opt_with_record(transition);
    }

    /// Performs an optimization step and returns some information.
    fn opt_with_record(&mut self, transition: &Transition<E>) -> Record;

    /// Called once, at the final step of the episode with the given index.
    ///
    /// Agents update their per-episode state here, e.g. the exploration rate.
    #[allow(unused_variables)]
    fn end_episode(&mut self, episode: usize) -> Record {
        Record::empty()
    }
}
