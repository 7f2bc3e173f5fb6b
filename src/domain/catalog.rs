pub mod catalog_type;
pub mod profile_catalog;
pub mod runtime_catalog;
pub mod transformation_catalog;
