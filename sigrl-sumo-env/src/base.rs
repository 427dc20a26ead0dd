//! Signalized intersection simulated by SUMO.
use crate::{
    act::apply_phase,
    obs::{discover_lanes, read_queues},
    reward::reward,
    Connector, PhaseAct, QueueObs, SimClient, SimError, SumoEnvConfig, SumoEnvError,
};
use anyhow::{Context, Result};
use log::{info, trace, warn};
use sigrl_core::{
    record::{Record, RecordValue},
    Env, Info, Step,
};

/// Information given at every step.
#[derive(Clone, Debug)]
pub struct SumoInfo {
    /// Raw halting-vehicle count per monitored lane after the dwell duration.
    pub halting: Vec<u32>,
}

impl Info for SumoInfo {}

/// One traffic light of a running simulation, controlled through a [`SimClient`].
///
/// The simulation is started by [`Env::reset`] and ended by [`Env::close`], so
/// each episode runs in a fresh simulator. The connection is also closed when
/// the environment is dropped.
pub struct SumoEnv<C: Connector> {
    config: SumoEnvConfig<C>,
    client: Option<C::Client>,
    lanes: Vec<String>,
    obs: QueueObs,
}

impl<C: Connector> SumoEnv<C> {
    /// Lanes monitored in the current episode, in the order of the observation.
    pub fn lanes(&self) -> &[String] {
        &self.lanes
    }

    /// Returns `true` while a simulation is connected.
    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    fn client(&mut self) -> Result<&mut C::Client, SimError> {
        self.client.as_mut().ok_or(SimError::Closed)
    }
}

impl<C: Connector> Env for SumoEnv<C> {
    type Config = SumoEnvConfig<C>;
    type Obs = QueueObs;
    type Act = PhaseAct;
    type Info = SumoInfo;

    /// The seed is not used: randomness of the traffic comes from the route file.
    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
            client: None,
            lanes: vec![],
            obs: QueueObs::zeros(config.n_lanes),
        })
    }

    /// Starts a simulation, discovers the monitored lanes and returns the all-zero observation.
    fn reset(&mut self) -> Result<QueueObs> {
        self.close()?;
        trace!("SumoEnv::reset()");
        self.client = Some(C::connect(&self.config.connector).context("Failed to start SUMO")?);

        let lanes = discover_lanes(self.client()?)?;
        if lanes.is_empty() {
            return Err(SumoEnvError::NoDetectors.into());
        }
        if lanes.len() != self.config.n_lanes {
            return Err(SumoEnvError::LaneCountMismatch {
                expected: self.config.n_lanes,
                found: lanes.len(),
            }
            .into());
        }
        info!("Monitored lanes: {:?}", lanes);
        self.lanes = lanes;
        self.obs = QueueObs::zeros(self.config.n_lanes);
        Ok(self.obs.clone())
    }

    /// Holds the phase of `a` for the dwell duration, then observes the queues.
    ///
    /// The reward is the decrease of the bucketed total queue since the previous observation.
    fn step(&mut self, a: &PhaseAct) -> Result<(Step<Self>, Record)> {
        let tls_id = self.config.tls_id.clone();
        let dwell_steps = self.config.dwell_steps;
        let client = self.client()?;
        apply_phase(client, &tls_id, *a, dwell_steps)?;

        let (obs, halting) = read_queues(
            self.client.as_mut().ok_or(SimError::Closed)?,
            &self.lanes,
            &self.config.thresholds,
        )?;
        let r = reward(self.obs.buckets(), obs.buckets());
        self.obs = obs.clone();

        let record = Record::from_slice(&[
            ("reward", RecordValue::Scalar(r)),
            ("phase", RecordValue::Scalar(a.0 as f32)),
            (
                "obs",
                RecordValue::Array1(obs.buckets().iter().map(|&b| b as f32).collect()),
            ),
            (
                "halting",
                RecordValue::Array1(halting.iter().map(|&m| m as f32).collect()),
            ),
        ]);
        Ok((Step::new(obs, *a, r, SumoInfo { halting }), record))
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut client) = self.client.take() {
            trace!("SumoEnv::close()");
            client.close()?;
        }
        Ok(())
    }
}

impl<C: Connector> Drop for SumoEnv<C> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to close the simulation: {:?}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockConfig, MockConnector};
    use sigrl_core::EnvSession;

    type MockEnv = SumoEnv<MockConnector>;

    fn config(mock: MockConfig) -> SumoEnvConfig<MockConnector> {
        SumoEnvConfig::default().connector(mock).dwell_steps(5)
    }

    #[test]
    fn test_reset_discovers_lanes() -> Result<()> {
        let mock = MockConfig::default();
        let probe = mock.probe.clone();
        let mut env = MockEnv::build(&config(mock), 0)?;
        assert!(!env.is_connected());

        let obs = env.reset()?;
        assert_eq!(obs, QueueObs::zeros(4));
        assert_eq!(env.lanes(), &["1i_0", "2i_0", "3i_0", "4i_0"]);

        env.reset()?;
        let counts = probe.counts();
        assert_eq!(counts.connects, 2);
        assert_eq!(counts.closes, 1);
        Ok(())
    }

    #[test]
    fn test_step_reward_follows_queues() -> Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();
        let mock = MockConfig::default().readings(vec![
            vec![0, 4, 8, 9],
            vec![0, 0, 2, 7],
        ]);
        let probe = mock.probe.clone();
        let mut env = MockEnv::build(&config(mock), 0)?;
        env.reset()?;

        let (step, record) = env.step(&PhaseAct(1))?;
        assert_eq!(step.obs.buckets(), &[0, 1, 2, 2]);
        assert_eq!(step.reward, -5.0);
        assert_eq!(step.info.halting, vec![0, 4, 8, 9]);
        assert_eq!(record.get_scalar("phase")?, 1.0);
        assert_eq!(record.get_array1("obs")?, vec![0.0, 1.0, 2.0, 2.0]);
        assert_eq!(record.get_array1("halting")?, vec![0.0, 4.0, 8.0, 9.0]);

        let (step, _) = env.step(&PhaseAct(3))?;
        assert_eq!(step.obs.buckets(), &[0, 0, 0, 2]);
        assert_eq!(step.reward, 3.0);

        assert_eq!(probe.counts().sim_steps, 10);
        Ok(())
    }

    #[test]
    fn test_lane_count_mismatch() -> Result<()> {
        let mock = MockConfig::default().lanes(&["a", "b"]);
        let probe = mock.probe.clone();
        let mut env = MockEnv::build(&config(mock), 0)?;

        assert!(EnvSession::open(&mut env).is_err());
        assert!(!env.is_connected());
        assert_eq!(probe.counts().closes, 1);
        Ok(())
    }

    #[test]
    fn test_session_closes_on_failed_phase() -> Result<()> {
        let mock = MockConfig::default().n_phases(4);
        let probe = mock.probe.clone();
        let mut env = MockEnv::build(&config(mock), 0)?;

        let result = (|| -> Result<()> {
            let (mut session, _) = EnvSession::open(&mut env)?;
            session.step(&PhaseAct(0))?;
            session.step(&PhaseAct(5))?;
            session.close()
        })();

        assert!(result.is_err());
        assert!(!env.is_connected());
        let counts = probe.counts();
        assert_eq!(counts.connects, 1);
        assert_eq!(counts.closes, 1);
        Ok(())
    }

    #[test]
    fn test_step_without_reset() -> Result<()> {
        let mut env = MockEnv::build(&config(MockConfig::default()), 0)?;
        assert!(env.step(&PhaseAct(0)).is_err());
        Ok(())
    }
}
