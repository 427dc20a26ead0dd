//! Per-episode statistics of a training run.
use serde::Serialize;

/// Step counts and cumulative rewards of the training episodes, in episode order.
///
/// The two sequences always have the same length. Entries are only appended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpisodeStats {
    steps: Vec<usize>,
    returns: Vec<f32>,
}

/// One row of [`EpisodeStats`], used for exporting.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EpisodeRow {
    /// Episode index.
    pub episode: usize,

    /// Number of steps in the episode.
    pub steps: usize,

    /// Cumulative reward of the episode.
    #[serde(rename = "return")]
    pub episode_return: f32,
}

impl EpisodeStats {
    /// Appends the statistics of an episode.
    pub fn push(&mut self, steps: usize, episode_return: f32) {
        self.steps.push(steps);
        self.returns.push(episode_return);
    }

    /// Step counts of the episodes.
    pub fn steps(&self) -> &[usize] {
        &self.steps
    }

    /// Cumulative rewards of the episodes.
    pub fn returns(&self) -> &[f32] {
        &self.returns
    }

    /// The number of recorded episodes.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if no episode has been recorded.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Mean of the cumulative rewards over the last `n` episodes.
    pub fn mean_return_of_last(&self, n: usize) -> Option<f32> {
        let n = n.min(self.returns.len());
        if n == 0 {
            return None;
        }
        let tail = &self.returns[self.returns.len() - n..];
        Some(tail.iter().sum::<f32>() / n as f32)
    }

    /// Iterates over the episodes as rows.
    pub fn rows(&self) -> impl Iterator<Item = EpisodeRow> + '_ {
        self.steps
            .iter()
            .zip(self.returns.iter())
            .enumerate()
            .map(|(episode, (&steps, &episode_return))| EpisodeRow {
                episode,
                steps,
                episode_return,
            })
    }
}
