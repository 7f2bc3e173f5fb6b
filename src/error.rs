use thiserror::Error;

use crate::domain::utils::id::{NodeId, SiteId, TransformationName};

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse planner JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Failed to write schedule statistics: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid planner configuration: {0}")]
    ConversionError(#[from] ConversionError),

    #[error("Node '{0}' is already part of the workflow graph")]
    DuplicateNodeError(NodeId),

    #[error("Node '{0}' is not part of the workflow graph")]
    UnknownNodeError(NodeId),

    #[error("Edge '{parent}' -> '{child}' would introduce a cycle")]
    CycleError { parent: NodeId, child: NodeId },

    #[error("Runtime {value} of '{node}' is not a finite, non-negative number")]
    InvalidRuntimeError { node: NodeId, value: f64 },

    #[error("Catalog runtime {value} of transformation '{transformation}' is not a finite, non-negative number")]
    InvalidCatalogRuntimeError { transformation: TransformationName, value: f64 },

    #[error("Site '{0}' was supplied more than once")]
    DuplicateSiteError(SiteId),

    #[error("No candidate sites were supplied for scheduling")]
    NoSitesAvailableError,

    #[error("No runnable site for node '{0}'")]
    NoRunnableSiteError(NodeId),

    #[error("Scheduling budget exhausted after {scheduled} of {total} nodes")]
    BudgetExceededError { scheduled: usize, total: usize },

    #[error("Node '{0}' has not been scheduled")]
    UnscheduledNodeError(NodeId),
}

/// Failures while turning configuration strings into typed policies or backends.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Unknown priority policy: {0}")]
    UnknownPriorityPolicy(String),

    #[error("Unknown timeline policy: {0}")]
    UnknownTimelinePolicy(String),

    #[error("Unknown capacity policy: {0}")]
    UnknownCapacityPolicy(String),

    #[error("Unknown runtime catalog type: {0}")]
    UnknownCatalogType(String),

    #[error("Runtime catalog '{0}' requires a catalog file")]
    MissingCatalogFile(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidConfigValue { field: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;
