//! Contract of the simulation control client.
use crate::SimError;
use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

/// Commands and queries the environment needs from a running simulation.
///
/// A client is a live connection: it is created by [`Connector::connect`] at the
/// start of an episode and released with [`SimClient::close`] at its end. Every
/// call blocks until the simulator has answered.
pub trait SimClient {
    /// Advances the simulation by exactly one time step.
    fn simulation_step(&mut self) -> Result<(), SimError>;

    /// Returns the identifiers of all induction loops (detectors) in the network.
    fn induction_loop_ids(&mut self) -> Result<Vec<String>, SimError>;

    /// Returns the identifier of the lane a detector is placed on.
    fn lane_of_detector(&mut self, detector: &str) -> Result<String, SimError>;

    /// Returns the number of halted vehicles on a lane in the last time step.
    fn halting_vehicle_count(&mut self, lane: &str) -> Result<u32, SimError>;

    /// Switches a traffic light to the phase with the given index of its current program.
    fn set_phase(&mut self, tls: &str, phase: usize) -> Result<(), SimError>;

    /// Ends the simulation and releases the connection.
    fn close(&mut self) -> Result<(), SimError>;
}

/// Starts a simulation and connects a [`SimClient`] to it.
pub trait Connector {
    /// Configuration.
    type Config: Clone + Debug + Default + Serialize + DeserializeOwned;

    /// The client produced by this connector.
    type Client: SimClient;

    /// Starts a simulation and returns a client connected to it.
    fn connect(config: &Self::Config) -> Result<Self::Client>;
}
