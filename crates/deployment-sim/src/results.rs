//! Results collection and output for deployment runs.

use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use coverage_kernel::deployment::CoverageSummary;
use coverage_kernel::DeploymentConfig;

/// Record of a single deployment run, written as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    /// Unique id for this run
    pub run_id: Uuid,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the run finished
    pub ended_at: DateTime<Utc>,
    /// Seed used for sensor placement
    pub seed: u64,
    /// Number of sensors scattered before the robots started
    pub sensor_count: usize,
    /// Wall-clock duration of the run
    pub elapsed_ms: u64,
    /// The configuration the run used
    pub config: DeploymentConfig,
    /// Final coverage figures from the base station
    pub summary: CoverageSummary,
}

impl RunRecord {
    /// Assemble a record from a finished run.
    pub fn new(
        seed: u64,
        sensor_count: usize,
        elapsed_ms: u64,
        config: DeploymentConfig,
        summary: CoverageSummary,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at,
            ended_at: Utc::now(),
            seed,
            sensor_count,
            elapsed_ms,
            config,
            summary,
        }
    }

    /// Write the record as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_to_json() {
        let record = RunRecord::new(
            42,
            25,
            1234,
            DeploymentConfig::default(),
            CoverageSummary::default(),
            Utc::now(),
        );
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"seed\":42"));
        assert!(json.contains("coverage_percent"));
    }
}
