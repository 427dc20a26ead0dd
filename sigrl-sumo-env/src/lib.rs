#![warn(missing_docs)]
//! A signalized intersection simulated by [SUMO](https://eclipse.dev/sumo/), as an
//! [`Env`](sigrl_core::Env).
//!
//! [`SumoEnv`] controls one traffic light through a [`SimClient`]. Each decision
//! switches the light to a phase ([`PhaseAct`]), holds it for a fixed number of
//! simulation steps, then observes the halting-vehicle count of every monitored
//! lane, bucketed into [`QueueObs`]. The reward is the decrease of the total
//! bucketed queue.
//!
//! The simulation is restarted at every episode. [`TraciConnector`] launches SUMO
//! and talks to it with the TraCI protocol; [`mock::MockConnector`] answers from a
//! script and is used in tests.
//!
//! ```no_run
//! use sigrl_core::Env;
//! use sigrl_sumo_env::{SumoEnv, SumoEnvConfig, TraciConfig, TraciConnector, PhaseAct};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = SumoEnvConfig::<TraciConnector>::default()
//!     .connector(TraciConfig::default().sumo_cfg("data/cross.sumocfg"));
//! let mut env = SumoEnv::build(&config, 0)?;
//! let _obs = env.reset()?;
//! let (step, _record) = env.step(&PhaseAct(0))?;
//! println!("reward = {}", step.reward);
//! env.close()?;
//! # Ok(())
//! # }
//! ```
pub mod act;
mod base;
mod client;
mod config;
mod error;
pub mod mock;
pub mod obs;
pub mod reward;
mod route;
mod traci;

pub use act::PhaseAct;
pub use base::{SumoEnv, SumoInfo};
pub use client::{Connector, SimClient};
pub use config::SumoEnvConfig;
pub use error::{SimError, SumoEnvError};
pub use obs::{QueueObs, QueueThresholds};
pub use route::RouteGenerator;
pub use traci::{SumoProcess, TraciClient, TraciConfig, TraciConnector};
