use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransformationCatalogDto {
    pub entries: Vec<TransformationEntryDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransformationEntryDto {
    /// e.g. "montage::mProject:1.0"
    pub name: String,
    pub runtime: Option<f64>,
    #[serde(default)]
    pub site_runtimes: BTreeMap<String, f64>,
}
