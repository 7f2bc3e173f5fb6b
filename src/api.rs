pub mod catalog_dto;
pub mod config_dto;
pub mod schedule_dto;
pub mod site_dto;
pub mod workflow_dto;
