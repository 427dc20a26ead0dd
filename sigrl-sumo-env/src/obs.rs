//! Observation of the intersection: bucketed queue lengths.
use crate::{SimClient, SimError};
use log::trace;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use sigrl_core::Obs;

/// Bucket boundaries of queue lengths.
///
/// A reading `m` falls into bucket 0 if `m < low`, 1 if `low <= m < high`, 2 otherwise.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueThresholds {
    /// Lowest reading of bucket 1.
    pub low: u32,

    /// Lowest reading of bucket 2.
    pub high: u32,
}

impl Default for QueueThresholds {
    fn default() -> Self {
        Self { low: 3, high: 7 }
    }
}

impl QueueThresholds {
    /// Maps a halting-vehicle count to its bucket.
    pub fn bucket(&self, halting: u32) -> u8 {
        if halting < self.low {
            0
        } else if halting < self.high {
            1
        } else {
            2
        }
    }

    /// Returns `true` if the buckets are well ordered.
    pub fn is_valid(&self) -> bool {
        self.low <= self.high
    }
}

/// Maps a halting-vehicle count to its bucket with the default thresholds.
pub fn bucket(halting: u32) -> u8 {
    QueueThresholds::default().bucket(halting)
}

/// Bucketed queue length per monitored lane, in the order of lane discovery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueObs(Vec<u8>);

impl QueueObs {
    /// The observation of an empty intersection with `n_lanes` lanes.
    pub fn zeros(n_lanes: usize) -> Self {
        Self(vec![0; n_lanes])
    }

    /// Encodes raw halting-vehicle counts.
    pub fn encode(readings: &[u32], thresholds: &QueueThresholds) -> Self {
        Self(readings.iter().map(|&m| thresholds.bucket(m)).collect())
    }

    /// Bucket indices.
    pub fn buckets(&self) -> &[u8] {
        &self.0
    }

    /// Index of the observation among all `3^n` possible ones, first lane most significant.
    pub fn state_index(&self) -> usize {
        self.0.iter().fold(0, |acc, &b| acc * 3 + b as usize)
    }
}

impl Obs for QueueObs {
    fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<&QueueObs> for Array1<f32> {
    fn from(obs: &QueueObs) -> Self {
        obs.0.iter().map(|&b| b as f32).collect()
    }
}

impl From<QueueObs> for Array1<f32> {
    fn from(obs: QueueObs) -> Self {
        (&obs).into()
    }
}

/// Reads the halting-vehicle count of every lane and encodes it.
///
/// Returns the observation together with the raw readings.
pub fn read_queues<C: SimClient>(
    client: &mut C,
    lanes: &[String],
    thresholds: &QueueThresholds,
) -> Result<(QueueObs, Vec<u32>), SimError> {
    let readings = lanes
        .iter()
        .map(|lane| -> Result<u32, SimError> {
            let m = client.halting_vehicle_count(lane)?;
            trace!("lane {}: {} halting vehicles", lane, m);
            Ok(m)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((QueueObs::encode(&readings, thresholds), readings))
}

/// Discovers the monitored lanes: the lane of every induction loop, in detector order.
pub fn discover_lanes<C: SimClient>(client: &mut C) -> Result<Vec<String>, SimError> {
    client
        .induction_loop_ids()?
        .iter()
        .map(|det| client.lane_of_detector(det))
        .collect()
}
