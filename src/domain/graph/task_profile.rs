use std::collections::{BTreeMap, BTreeSet};

use crate::domain::utils::id::{NodeId, SiteId, TransformationName};
use crate::error::{Error, Result};

/// Runtime metadata of a task as supplied by the catalogs.
///
/// All values are optional. Missing values are resolved by the runtime catalog
/// and the configured defaults, never treated as errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskProfile {
    /// Declared average compute time in seconds.
    pub average_compute_time: Option<f64>,

    /// Per-site runtime overrides in seconds.
    pub site_runtimes: BTreeMap<SiteId, f64>,

    /// Key into a transformation catalog.
    pub transformation: Option<TransformationName>,

    /// Restricts the task to these sites. `None` means every site is runnable.
    pub runnable_sites: Option<BTreeSet<SiteId>>,

    /// Only sites offering this instance type are runnable.
    pub instance_type: Option<String>,

    /// Site chosen by the site selector. Written after scheduling.
    pub execution_site: Option<SiteId>,
}

impl TaskProfile {
    pub fn with_average(average_compute_time: f64) -> Self {
        TaskProfile { average_compute_time: Some(average_compute_time), ..Default::default() }
    }

    pub fn with_site_runtime(mut self, site: impl Into<SiteId>, runtime: f64) -> Self {
        self.site_runtimes.insert(site.into(), runtime);
        self
    }

    pub fn with_runnable_sites<I, S>(mut self, sites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SiteId>,
    {
        self.runnable_sites = Some(sites.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_instance_type(mut self, instance_type: impl Into<String>) -> Self {
        self.instance_type = Some(instance_type.into());
        self
    }

    pub fn with_transformation(mut self, transformation: impl Into<TransformationName>) -> Self {
        self.transformation = Some(transformation.into());
        self
    }

    /// Rejects negative, NaN and infinite runtimes.
    pub fn validate(&self, node_id: &NodeId) -> Result<()> {
        let declared = self.average_compute_time.into_iter();
        let overrides = self.site_runtimes.values().copied();

        for value in declared.chain(overrides) {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidRuntimeError { node: node_id.clone(), value });
            }
        }
        Ok(())
    }
}
