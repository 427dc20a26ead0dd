//! Environment step.
use super::Env;

/// Additional information to `Obs` and `Act`.
pub trait Info {}

impl Info for () {}

/// Represents an action, observation and reward tuple `(a_t, o_t+1, r_t)`
/// with some additional information.
///
/// An environment emits [`Step`] object at every interaction steps.
pub struct Step<E: Env> {
    /// Action.
    pub act: E::Act,

    /// Observation.
    pub obs: E::Obs,

    /// Reward.
    pub reward: f32,

    /// Information defined by user.
    pub info: E::Info,
}

impl<E: Env> Step<E> {
    /// Constructs a [`Step`] object.
    pub fn new(obs: E::Obs, act: E::Act, reward: f32, info: E::Info) -> Self {
        Step {
            act,
            obs,
            reward,
            info,
        }
    }
}

/// A transition `(o_t, a_t, o_t+1, r_t)`.
///
/// Transitions are consumed by [`Agent::opt`](crate::Agent::opt) as soon as they
/// are produced; nothing keeps them afterwards.
pub struct Transition<E: Env> {
    /// Observation before the action.
    pub obs: E::Obs,

    /// Action.
    pub act: E::Act,

    /// Observation after the action.
    pub next_obs: E::Obs,

    /// Reward.
    pub reward: f32,
}

impl<E: Env> Transition<E> {
    /// Creates a transition from the previous observation and the step that followed it.
    pub fn from_step(obs: E::Obs, step: Step<E>) -> Self {
        Self {
            obs,
            act: step.act,
            next_obs: step.obs,
            reward: step.reward,
        }
    }
}
