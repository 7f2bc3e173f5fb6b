pub mod catalog;
pub mod config;
pub mod graph;
pub mod makespan;
pub mod rank;
pub mod scheduler;
pub mod site;
pub mod site_selector;
pub mod statistics;
pub mod utils;
