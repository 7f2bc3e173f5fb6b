use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::config_dto::PlannerConfigDto;
use crate::domain::catalog::catalog_type::CatalogType;
use crate::domain::scheduler::scheduler_policy::{CapacityPolicy, PriorityPolicy, SchedulingBudget, TimelinePolicy};
use crate::domain::site::{DEFAULT_NUMBER_OF_FREE_NODES, Site};
use crate::error::{ConversionError, Error};

/// The average data that is transferred between two jobs of the workflow, in MB.
pub const AVERAGE_DATA_SIZE_BETWEEN_JOBS: f64 = 2.0;

/// The average bandwidth between the sites, in MB/s.
pub const AVERAGE_BANDWIDTH: f64 = 5.0;

/// Compute time in seconds assumed for a task without any runtime estimate.
pub const DEFAULT_AVERAGE_COMPUTE_TIME: f64 = 1.0;

/// Global settings of one planning run.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    pub average_data_size_between_jobs: f64,
    pub average_bandwidth: f64,
    pub default_average_compute_time: f64,
    pub default_free_units: u32,
    pub priority_policy: PriorityPolicy,
    pub timeline_policy: TimelinePolicy,
    pub capacity_policy: CapacityPolicy,
    pub budget: SchedulingBudget,
    pub catalog_type: CatalogType,
    pub catalog_file: Option<PathBuf>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            average_data_size_between_jobs: AVERAGE_DATA_SIZE_BETWEEN_JOBS,
            average_bandwidth: AVERAGE_BANDWIDTH,
            default_average_compute_time: DEFAULT_AVERAGE_COMPUTE_TIME,
            default_free_units: DEFAULT_NUMBER_OF_FREE_NODES,
            priority_policy: PriorityPolicy::default(),
            timeline_policy: TimelinePolicy::default(),
            capacity_policy: CapacityPolicy::default(),
            budget: SchedulingBudget::unlimited(),
            catalog_type: CatalogType::default(),
            catalog_file: None,
        }
    }
}

impl PlannerConfig {
    pub fn with_communication(mut self, average_data_size_between_jobs: f64, average_bandwidth: f64) -> Self {
        self.average_data_size_between_jobs = average_data_size_between_jobs;
        self.average_bandwidth = average_bandwidth;
        self
    }

    pub fn with_default_average_compute_time(mut self, default_average_compute_time: f64) -> Self {
        self.default_average_compute_time = default_average_compute_time;
        self
    }

    pub fn with_priority_policy(mut self, priority_policy: PriorityPolicy) -> Self {
        self.priority_policy = priority_policy;
        self
    }

    pub fn with_timeline_policy(mut self, timeline_policy: TimelinePolicy) -> Self {
        self.timeline_policy = timeline_policy;
        self
    }

    pub fn with_capacity_policy(mut self, capacity_policy: CapacityPolicy) -> Self {
        self.capacity_policy = capacity_policy;
        self
    }

    pub fn with_budget(mut self, budget: SchedulingBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Makes a relative catalog file path relative to `base_dir`, the directory of the configuration file.
    pub fn resolve_catalog_file(&mut self, base_dir: &Path) {
        if let Some(file) = self.catalog_file.take() {
            self.catalog_file = Some(if file.is_relative() { base_dir.join(file) } else { file });
        }
    }

    /// Rejects values that would make durations or transfer times negative or undefined.
    ///
    /// A bandwidth of 0 or below stays allowed and disables communication cost.
    pub fn validate(&self) -> Result<(), ConversionError> {
        non_negative("defaultAverageComputeTime", self.default_average_compute_time)?;
        non_negative("averageDataSizeBetweenJobs", self.average_data_size_between_jobs)?;
        if self.average_bandwidth.is_nan() {
            return Err(ConversionError::InvalidConfigValue { field: "averageBandwidth", value: self.average_bandwidth.to_string() });
        }
        Ok(())
    }

    /// Expected transfer time between two jobs, used while ranking before any placement is known.
    pub fn average_communication_cost(&self) -> f64 {
        transfer_time(self.average_data_size_between_jobs, self.average_bandwidth)
    }

    /// Transfer time between a job on `from` and its child on `to`. Zero on the same site.
    ///
    /// The slower of the two sites bounds the transfer. If either bandwidth is unknown
    /// the configured average bandwidth is used.
    pub fn communication_delay(&self, from: &Site, to: &Site) -> f64 {
        if from.id == to.id {
            return 0.0;
        }
        let bandwidth = match (from.bandwidth, to.bandwidth) {
            (Some(a), Some(b)) => a.min(b),
            _ => self.average_bandwidth,
        };
        transfer_time(self.average_data_size_between_jobs, bandwidth)
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConversionError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConversionError::InvalidConfigValue { field, value: value.to_string() })
    }
}

fn transfer_time(data_size: f64, bandwidth: f64) -> f64 {
    if data_size <= 0.0 {
        return 0.0;
    }
    if bandwidth > 0.0 {
        data_size / bandwidth
    } else {
        log::warn!("Bandwidth is {}, setting communication time to 0", bandwidth);
        0.0
    }
}

impl TryFrom<PlannerConfigDto> for PlannerConfig {
    type Error = Error;

    fn try_from(dto: PlannerConfigDto) -> Result<Self, Self::Error> {
        let config = PlannerConfig {
            average_data_size_between_jobs: dto.average_data_size_between_jobs,
            average_bandwidth: dto.average_bandwidth,
            default_average_compute_time: dto.default_average_compute_time,
            default_free_units: dto.default_free_units,
            priority_policy: dto.priority_policy.parse()?,
            timeline_policy: dto.timeline_policy.parse()?,
            capacity_policy: dto.capacity_policy.parse()?,
            budget: SchedulingBudget { max_assignments: dto.max_assignments, time_limit: dto.time_limit_ms.map(Duration::from_millis) },
            catalog_type: dto.catalog_type.parse()?,
            catalog_file: dto.catalog_file.map(PathBuf::from),
        };
        config.validate()?;
        Ok(config)
    }
}
