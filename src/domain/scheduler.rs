pub mod heft_scheduler;
pub mod schedule;
pub mod scheduler_policy;
