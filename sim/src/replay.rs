//! Replay: serialize/deserialize frame logs for offline evaluation.

use crate::{scenarios::Scenario, stream::Frame};
use serde::{Deserialize, Serialize};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use vtrack_core::VectorTrackerConfig;

/// A full recorded frame log with ground-truth labels.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ReplayLog {
    pub scenario_name: String,
    pub seed: u64,
    pub dim: usize,
    pub large_distance: f64,
    pub distance_threshold: f64,
    /// All frames in order
    pub frames: Vec<Frame>,
}

impl ReplayLog {
    /// Record every frame of `scenario`.
    pub fn record(scenario: &Scenario) -> Self {
        Self::from_frames(scenario, scenario.generate())
    }

    /// Wrap frames already generated from `scenario`.
    pub fn from_frames(scenario: &Scenario, frames: Vec<Frame>) -> Self {
        Self {
            scenario_name: scenario.name.clone(),
            seed: scenario.seed,
            dim: scenario.dim,
            large_distance: scenario.large_distance,
            distance_threshold: scenario.distance_threshold,
            frames,
        }
    }

    /// Tracker configuration the log was recorded for.
    pub fn tracker_config(&self) -> VectorTrackerConfig {
        VectorTrackerConfig {
            distance_threshold: self.distance_threshold,
            ..VectorTrackerConfig::new(self.dim, self.large_distance)
        }
    }
}

/// Save a replay log to a JSON file.
pub fn save_replay(log: &ReplayLog, path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, log)?;
    Ok(())
}

/// Load a replay log from a JSON file.
pub fn load_replay(path: &Path) -> anyhow::Result<ReplayLog> {
    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);
    let log: ReplayLog = serde_json::from_reader(reader)?;
    Ok(log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::ScenarioKind;

    #[test]
    fn save_then_load_restores_log() {
        let scenario = Scenario::build(ScenarioKind::Simple, 3);
        let log = ReplayLog::record(&scenario);
        let path = std::env::temp_dir().join(format!("vtrack_replay_{}.json", std::process::id()));

        save_replay(&log, &path).unwrap();
        let loaded = load_replay(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.scenario_name, "simple");
        assert_eq!(loaded.frames.len(), log.frames.len());
        assert_eq!(loaded.frames[0].labels, log.frames[0].labels);
        assert_eq!(loaded.tracker_config().dim, 2);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_replay(Path::new("/nonexistent/vtrack.json")).is_err());
    }
}
