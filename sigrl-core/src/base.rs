//! Core functionalities.
mod agent;
mod env;
mod policy;
mod session;
mod step;
pub use agent::Agent;
pub use env::Env;
pub use policy::Policy;
pub use session::EnvSession;
use std::fmt::Debug;
pub use step::{Info, Step, Transition};

/// An observation of an environment.
///
/// Vectorized environments are not supported, so an observation always
/// describes a single environment.
pub trait Obs: Clone + Debug {
    /// Returns the number of elements in the observation.
    fn len(&self) -> usize;

    /// Returns `true` if the observation has no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An action of an environment.
pub trait Act: Clone + Debug {}
