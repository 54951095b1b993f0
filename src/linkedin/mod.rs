// src/linkedin/mod.rs
pub mod campaign;
pub mod client;
pub mod detail_parser;
pub mod list_parser;
pub mod orchestrator;
pub mod search;

pub use campaign::{run_campaign, CampaignConfig, SearchProfile};
pub use client::{JobSource, LinkedInClient};
pub use detail_parser::parse_job_detail;
pub use list_parser::{extract_job_id, parse_job_list};
pub use orchestrator::{
    dedup_by_url, sort_jobs, DelayRange, PolitenessDelays, SearchOrchestrator, SearchOutcome,
    StopReason,
};
pub use search::{ApplyFilter, ExperienceLevel, JobType, SearchQuery, TimePeriod};
