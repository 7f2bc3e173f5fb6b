use std::collections::{BTreeMap, HashMap};

use crate::api::catalog_dto::TransformationCatalogDto;
use crate::domain::catalog::profile_catalog::ProfileCatalog;
use crate::domain::catalog::runtime_catalog::RuntimeCatalog;
use crate::domain::graph::task_profile::TaskProfile;
use crate::domain::utils::id::{SiteId, TransformationName};
use crate::error::{Error, Result};

/// Runtime entry of one transformation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformationEntry {
    pub runtime: Option<f64>,
    pub site_runtimes: BTreeMap<SiteId, f64>,
}

impl TransformationEntry {
    /// Rejects negative, NaN and infinite runtimes.
    pub fn validate(&self, name: &TransformationName) -> Result<()> {
        for value in self.runtime.into_iter().chain(self.site_runtimes.values().copied()) {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidCatalogRuntimeError { transformation: name.clone(), value });
            }
        }
        Ok(())
    }
}

/// Runtimes keyed by transformation name.
///
/// A task refers to its transformation through [`TaskProfile::transformation`].
/// When the catalog has no value, the task's own profile is consulted.
#[derive(Debug, Clone, Default)]
pub struct TransformationCatalog {
    entries: HashMap<TransformationName, TransformationEntry>,
}

impl TransformationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<TransformationName>, entry: TransformationEntry) -> Result<()> {
        let name = name.into();
        entry.validate(&name)?;
        self.entries.insert(name, entry);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup(&self, task: &TaskProfile) -> Option<&TransformationEntry> {
        self.entries.get(task.transformation.as_ref()?)
    }
}

impl TryFrom<TransformationCatalogDto> for TransformationCatalog {
    type Error = Error;

    fn try_from(dto: TransformationCatalogDto) -> Result<Self> {
        let mut catalog = TransformationCatalog::new();
        for entry in dto.entries {
            let site_runtimes = entry.site_runtimes.into_iter().map(|(site, runtime)| (SiteId::new(site), runtime)).collect();
            catalog.insert(TransformationName::new(entry.name), TransformationEntry { runtime: entry.runtime, site_runtimes })?;
        }
        Ok(catalog)
    }
}

impl RuntimeCatalog for TransformationCatalog {
    fn name(&self) -> &'static str {
        "Transformation"
    }

    fn declared_average(&self, task: &TaskProfile) -> Option<f64> {
        self.lookup(task).and_then(|entry| entry.runtime).or_else(|| ProfileCatalog.declared_average(task))
    }

    fn site_runtime(&self, task: &TaskProfile, site: &SiteId) -> Option<f64> {
        self.lookup(task).and_then(|entry| entry.site_runtimes.get(site).copied()).or_else(|| ProfileCatalog.site_runtime(task, site))
    }
}
