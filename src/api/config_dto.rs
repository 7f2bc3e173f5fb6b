use serde::{Deserialize, Serialize};

use crate::domain::config::{AVERAGE_BANDWIDTH, AVERAGE_DATA_SIZE_BETWEEN_JOBS, DEFAULT_AVERAGE_COMPUTE_TIME};
use crate::domain::site::DEFAULT_NUMBER_OF_FREE_NODES;

/// Planner configuration file. Every field is optional.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PlannerConfigDto {
    /// In MB.
    pub average_data_size_between_jobs: f64,
    /// In MB/s.
    pub average_bandwidth: f64,
    /// In seconds.
    pub default_average_compute_time: f64,
    pub default_free_units: u32,

    /// "Critical-Path", "Upward-Rank" or "Downward-Rank".
    pub priority_policy: String,
    /// "Append" or "Insertion".
    pub timeline_policy: String,
    /// "Informational" or "Slot-Limited".
    pub capacity_policy: String,

    pub max_assignments: Option<usize>,
    pub time_limit_ms: Option<u64>,

    /// "Profile" or "Transformation".
    pub catalog_type: String,
    pub catalog_file: Option<String>,
}

impl Default for PlannerConfigDto {
    fn default() -> Self {
        PlannerConfigDto {
            average_data_size_between_jobs: AVERAGE_DATA_SIZE_BETWEEN_JOBS,
            average_bandwidth: AVERAGE_BANDWIDTH,
            default_average_compute_time: DEFAULT_AVERAGE_COMPUTE_TIME,
            default_free_units: DEFAULT_NUMBER_OF_FREE_NODES,
            priority_policy: "Critical-Path".to_string(),
            timeline_policy: "Append".to_string(),
            capacity_policy: "Informational".to_string(),
            max_assignments: None,
            time_limit_ms: None,
            catalog_type: "Profile".to_string(),
            catalog_file: None,
        }
    }
}
