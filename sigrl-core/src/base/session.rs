//! Episode-scoped access to an environment.
use super::{Env, Step};
use crate::record::Record;
use anyhow::Result;
use log::warn;

/// Holds an environment for the duration of one episode.
///
/// [`EnvSession::open`] resets the environment, which acquires its external resource.
/// The resource is released by [`EnvSession::close`] or, if the session is dropped
/// before that (an error was propagated with `?`, or a panic unwinds), by [`Drop`].
pub struct EnvSession<'a, E: Env> {
    env: &'a mut E,
    open: bool,
}

impl<'a, E: Env> EnvSession<'a, E> {
    /// Starts an episode and returns the session with the initial observation.
    ///
    /// If the reset fails, whatever the environment managed to acquire is released
    /// before the error is returned.
    pub fn open(env: &'a mut E) -> Result<(Self, E::Obs)> {
        match env.reset() {
            Ok(obs) => Ok((Self { env, open: true }, obs)),
            Err(e) => {
                if let Err(e_close) = env.close() {
                    warn!("Failed to release the environment after reset error: {:?}", e_close);
                }
                Err(e)
            }
        }
    }

    /// Performs an environment step.
    pub fn step(&mut self, a: &E::Act) -> Result<(Step<E>, Record)> {
        self.env.step(a)
    }

    /// Ends the episode and releases the environment.
    pub fn close(mut self) -> Result<()> {
        self.open = false;
        self.env.close()
    }
}

impl<'a, E: Env> Drop for EnvSession<'a, E> {
    fn drop(&mut self) {
        if self.open {
            self.open = false;
            if let Err(e) = self.env.close() {
                warn!("Failed to release the environment: {:?}", e);
            }
        }
    }
}
