use crate::api::site_dto::SiteDto;
use crate::domain::graph::task_profile::TaskProfile;
use crate::domain::utils::id::SiteId;

pub mod timeline;

/// Number of execution units assumed for a site whose catalog entry knows neither idle nor total units.
pub const DEFAULT_NUMBER_OF_FREE_NODES: u32 = 10;

/// A scheduling target as described by the site catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub id: SiteId,

    /// Currently free execution slots, if the catalog reports them.
    pub idle_units: Option<u32>,

    /// Total execution slots, used when idle units are unknown.
    pub total_units: Option<u32>,

    /// Average bandwidth in MB/s.
    pub bandwidth: Option<f64>,

    pub instance_type: Option<String>,
}

impl Site {
    pub fn new(id: impl Into<SiteId>) -> Self {
        Site { id: id.into(), idle_units: None, total_units: None, bandwidth: None, instance_type: None }
    }

    pub fn with_idle_units(mut self, idle_units: u32) -> Self {
        self.idle_units = Some(idle_units);
        self
    }

    pub fn with_total_units(mut self, total_units: u32) -> Self {
        self.total_units = Some(total_units);
        self
    }

    pub fn with_bandwidth(mut self, bandwidth: f64) -> Self {
        self.bandwidth = Some(bandwidth);
        self
    }

    pub fn with_instance_type(mut self, instance_type: impl Into<String>) -> Self {
        self.instance_type = Some(instance_type.into());
        self
    }

    /// True if the task may run here: the site is among the task's runnable sites
    /// and offers the instance type the task asks for.
    pub fn can_run(&self, task: &TaskProfile) -> bool {
        let is_listed = task.runnable_sites.as_ref().is_none_or(|runnable| runnable.contains(&self.id));
        let has_instance_type = match &task.instance_type {
            Some(required) => self.instance_type.as_deref() == Some(required.as_str()),
            None => true,
        };
        is_listed && has_instance_type
    }

    /// Idle units if known, else total units, else `default_units`.
    pub fn resolved_units(&self, default_units: u32) -> u32 {
        match (self.idle_units, self.total_units) {
            (Some(idle), _) => idle,
            (None, Some(total)) => {
                log::debug!("Picking up total units for site {}.", self.id);
                total
            }
            (None, None) => {
                log::debug!("Picking up default free units ({}) for site {}.", default_units, self.id);
                default_units
            }
        }
    }
}

impl From<SiteDto> for Site {
    fn from(dto: SiteDto) -> Self {
        Site { id: SiteId::new(dto.id), idle_units: dto.idle_units, total_units: dto.total_units, bandwidth: dto.bandwidth, instance_type: dto.instance_type }
    }
}
