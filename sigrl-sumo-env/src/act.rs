//! Action: the signal phase to hold for the next dwell duration.
use crate::{SimClient, SimError};
use serde::{Deserialize, Serialize};
use sigrl_core::Act;

/// Index of a phase of the controlled traffic light's program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseAct(pub usize);

impl Act for PhaseAct {}

impl From<usize> for PhaseAct {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

impl From<PhaseAct> for usize {
    fn from(a: PhaseAct) -> Self {
        a.0
    }
}

/// Switches `tls` to the phase of `act`, then advances the simulation by `dwell_steps`.
///
/// A phase index outside the light's program is rejected by the simulator and the
/// error is returned as is.
pub fn apply_phase<C: SimClient>(
    client: &mut C,
    tls: &str,
    act: PhaseAct,
    dwell_steps: usize,
) -> Result<(), SimError> {
    client.set_phase(tls, act.0)?;
    for _ in 0..dwell_steps {
        client.simulation_step()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockConfig, MockConnector};
    use crate::Connector;

    #[test]
    fn test_apply_phase_dwells() -> anyhow::Result<()> {
        let config = MockConfig::default();
        let probe = config.probe.clone();
        let mut client = MockConnector::connect(&config)?;

        apply_phase(&mut client, "0", PhaseAct(2), 50)?;
        apply_phase(&mut client, "0", PhaseAct(0), 50)?;

        let counts = probe.counts();
        assert_eq!(counts.sim_steps, 100);
        assert_eq!(counts.phases, vec![2, 0]);
        Ok(())
    }

    #[test]
    fn test_invalid_phase_is_an_error() -> anyhow::Result<()> {
        let config = MockConfig::default().n_phases(4);
        let probe = config.probe.clone();
        let mut client = MockConnector::connect(&config)?;

        let res = apply_phase(&mut client, "0", PhaseAct(5), 50);

        assert!(matches!(res, Err(SimError::Command { .. })));
        assert_eq!(probe.counts().sim_steps, 0);
        Ok(())
    }
}
