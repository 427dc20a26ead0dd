//! Scripted simulation client, used for tests and dry runs.
use crate::{Connector, SimClient, SimError};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Calls observed by a [`MockProbe`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MockCounts {
    /// Connections opened.
    pub connects: usize,

    /// Connections closed.
    pub closes: usize,

    /// Simulation steps.
    pub sim_steps: usize,

    /// Accepted phase commands, in order.
    pub phases: Vec<usize>,
}

/// Counters shared by every client of a [`MockConfig`] and the test inspecting them.
#[derive(Clone, Debug, Default)]
pub struct MockProbe(Arc<Mutex<MockCounts>>);

impl MockProbe {
    /// Returns a snapshot of the counters.
    pub fn counts(&self) -> MockCounts {
        self.0.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn update(&self, f: impl FnOnce(&mut MockCounts)) {
        if let Ok(mut c) = self.0.lock() {
            f(&mut c)
        }
    }
}

/// Configuration of [`MockConnector`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MockConfig {
    /// Lanes of the network; detector `det_i` sits on the `i`-th lane.
    pub lanes: Vec<String>,

    /// Halting-vehicle counts per lane.
    ///
    /// Row `k % readings.len()` is reported after the `k+1`-th phase command of a
    /// connection. Counts are 0 when empty.
    pub readings: Vec<Vec<u32>>,

    /// The number of phases of the traffic light program.
    pub n_phases: usize,

    /// If set, every phase command after this many fails with a protocol error.
    pub fail_after_phases: Option<usize>,

    /// Shared counters.
    #[serde(skip)]
    pub probe: MockProbe,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            lanes: ["1i_0", "2i_0", "3i_0", "4i_0"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            readings: vec![],
            n_phases: 6,
            fail_after_phases: None,
            probe: MockProbe::default(),
        }
    }
}

impl MockConfig {
    /// Sets the lanes.
    pub fn lanes(mut self, lanes: &[&str]) -> Self {
        self.lanes = lanes.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Sets the scripted readings.
    pub fn readings(mut self, readings: Vec<Vec<u32>>) -> Self {
        self.readings = readings;
        self
    }

    /// Sets the number of phases.
    pub fn n_phases(mut self, v: usize) -> Self {
        self.n_phases = v;
        self
    }

    /// Makes phase commands fail after `v` accepted ones.
    pub fn fail_after_phases(mut self, v: usize) -> Self {
        self.fail_after_phases = Some(v);
        self
    }
}

/// Opens [`MockClient`]s.
pub struct MockConnector;

impl Connector for MockConnector {
    type Config = MockConfig;
    type Client = MockClient;

    fn connect(config: &Self::Config) -> Result<Self::Client> {
        config.probe.update(|c| c.connects += 1);
        Ok(MockClient {
            config: config.clone(),
            n_phase_commands: 0,
            closed: false,
        })
    }
}

/// In-memory simulation answering from [`MockConfig`].
pub struct MockClient {
    config: MockConfig,
    n_phase_commands: usize,
    closed: bool,
}

impl MockClient {
    fn check_open(&self) -> Result<(), SimError> {
        if self.closed {
            Err(SimError::Closed)
        } else {
            Ok(())
        }
    }
}

impl SimClient for MockClient {
    fn simulation_step(&mut self) -> Result<(), SimError> {
        self.check_open()?;
        self.config.probe.update(|c| c.sim_steps += 1);
        Ok(())
    }

    fn induction_loop_ids(&mut self) -> Result<Vec<String>, SimError> {
        self.check_open()?;
        Ok((0..self.config.lanes.len())
            .map(|i| format!("det_{}", i))
            .collect())
    }

    fn lane_of_detector(&mut self, detector: &str) -> Result<String, SimError> {
        self.check_open()?;
        detector
            .strip_prefix("det_")
            .and_then(|i| i.parse::<usize>().ok())
            .and_then(|i| self.config.lanes.get(i).cloned())
            .ok_or_else(|| SimError::Command {
                cmd: 0xa0,
                status: 0xff,
                description: format!("Induction loop '{}' is not known", detector),
            })
    }

    fn halting_vehicle_count(&mut self, lane: &str) -> Result<u32, SimError> {
        self.check_open()?;
        let i = self
            .config
            .lanes
            .iter()
            .position(|l| l == lane)
            .ok_or_else(|| SimError::Command {
                cmd: 0xa3,
                status: 0xff,
                description: format!("Lane '{}' is not known", lane),
            })?;
        if self.config.readings.is_empty() {
            return Ok(0);
        }
        let row = self.n_phase_commands.saturating_sub(1) % self.config.readings.len();
        Ok(self.config.readings[row].get(i).copied().unwrap_or(0))
    }

    fn set_phase(&mut self, tls: &str, phase: usize) -> Result<(), SimError> {
        self.check_open()?;
        if Some(self.n_phase_commands) == self.config.fail_after_phases {
            return Err(SimError::Protocol("scripted connection failure".into()));
        }
        if phase >= self.config.n_phases {
            return Err(SimError::Command {
                cmd: 0xc2,
                status: 0xff,
                description: format!(
                    "The phase index {} is not in the allowed range [0,{}] of '{}'",
                    phase,
                    self.config.n_phases.saturating_sub(1),
                    tls
                ),
            });
        }
        self.n_phase_commands += 1;
        self.config.probe.update(|c| c.phases.push(phase));
        Ok(())
    }

    fn close(&mut self) -> Result<(), SimError> {
        if !self.closed {
            self.closed = true;
            self.config.probe.update(|c| c.closes += 1);
        }
        Ok(())
    }
}
