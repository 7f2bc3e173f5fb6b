use std::path::Path;
use std::str::FromStr;

use crate::api::catalog_dto::TransformationCatalogDto;
use crate::domain::catalog::profile_catalog::ProfileCatalog;
use crate::domain::catalog::runtime_catalog::RuntimeCatalog;
use crate::domain::catalog::transformation_catalog::TransformationCatalog;
use crate::error::{ConversionError, Result};
use crate::loader::parser::parse_json_file;

/// The runtime catalog backends the planner can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogType {
    /// Runtimes come from the task profiles of the workflow itself.
    #[default]
    Profile,
    /// Runtimes come from a transformation catalog file, task profiles fill the gaps.
    Transformation,
}

impl CatalogType {
    /// Factory method to return a concrete [`RuntimeCatalog`] based on the enum variant.
    pub fn get_instance(&self, catalog_file: Option<&Path>) -> Result<Box<dyn RuntimeCatalog>> {
        match self {
            CatalogType::Profile => Ok(Box::new(ProfileCatalog)),
            CatalogType::Transformation => {
                let path = catalog_file.ok_or_else(|| ConversionError::MissingCatalogFile("Transformation".to_string()))?;
                let dto: TransformationCatalogDto = parse_json_file(path)?;
                let catalog = TransformationCatalog::try_from(dto)?;
                log::info!("Loaded {} transformation entries from '{}'.", catalog.len(), path.display());
                Ok(Box::new(catalog))
            }
        }
    }
}

impl FromStr for CatalogType {
    type Err = ConversionError;

    fn from_str(s: &str) -> std::result::Result<CatalogType, Self::Err> {
        match s {
            "Profile" => Ok(CatalogType::Profile),
            "Transformation" => Ok(CatalogType::Transformation),
            _ => Err(ConversionError::UnknownCatalogType(s.to_string())),
        }
    }
}
