// src/types/mod.rs
pub mod job_record;

pub use job_record::{ApplyType, JobDetails, JobRecord};
