//! Errors of the environment and the simulator clients.
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while talking to the simulator.
///
/// None of them is recovered: they end the current episode.
#[derive(Error, Debug)]
pub enum SimError {
    /// I/O error on the connection.
    #[error("I/O error on the simulator connection: {0}")]
    Io(#[from] std::io::Error),

    /// The simulator answered a command with an error status.
    #[error("Simulator rejected command 0x{cmd:02x} (status 0x{status:02x}): {description}")]
    Command {
        /// Command identifier.
        cmd: u8,
        /// Status code of the response.
        status: u8,
        /// Description given by the simulator.
        description: String,
    },

    /// The response could not be decoded.
    #[error("Malformed response from the simulator: {0}")]
    Protocol(String),

    /// A command was issued on a closed connection.
    #[error("The simulator connection is closed")]
    Closed,

    /// The simulator process could not be started or reached.
    #[error("Failed to launch the simulator: {0}")]
    Launch(String),
}

/// Errors in the configuration of the environment.
///
/// These are reported at startup, before any episode runs.
#[derive(Error, Debug)]
pub enum SumoEnvError {
    /// `SUMO_HOME` is not set and no SUMO installation is configured.
    #[error(
        "please declare environment variable 'SUMO_HOME' as the root directory of your sumo \
         installation (it should contain folders 'bin', 'tools' and 'docs')"
    )]
    MissingSumoHome,

    /// The simulator binary does not exist.
    #[error("SUMO binary not found at {0:?}")]
    BinaryNotFound(PathBuf),

    /// The network has no induction loop to observe.
    #[error("No induction loop found in the network")]
    NoDetectors,

    /// The number of monitored lanes differs from the configured state dimension.
    #[error("Expected {expected} monitored lanes, found {found}")]
    LaneCountMismatch {
        /// Configured number of lanes.
        expected: usize,
        /// Number of lanes found in the network.
        found: usize,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
