// src/types/job_record.rs
//! Job posting records as produced by the list and detail parsers

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::{parse_applicant_count, parse_time_to_minutes};

/// How a posting accepts applications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplyType {
    EasyApply,
    External,
    #[default]
    Unknown,
}

impl ApplyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplyType::EasyApply => "EASY_APPLY",
            ApplyType::External => "EXTERNAL",
            ApplyType::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ApplyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ===== Job Record =====

/// One job posting. Field order is the column order of the CSV export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobRecord {
    pub title: String,
    pub location: String,
    pub posted_time: String,
    pub published_at: String,
    pub job_url: String,
    pub company_name: String,
    pub company_url: String,
    pub company_id: String,
    pub applications_count: String,
    pub description: String,
    pub contract_type: String,
    pub experience_level: String,
    pub work_type: String,
    pub sector: String,
    pub salary: String,
    pub poster_full_name: String,
    pub poster_profile_url: String,
    pub apply_url: String,
    pub apply_type: ApplyType,
    pub benefits: String,
    pub search_config: String,
}

/// Extended fields scraped from a single job's detail page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetails {
    pub description: String,
    pub experience_level: String,
    pub contract_type: String,
    pub work_type: String,
    pub sector: String,
    pub apply_type: ApplyType,
    pub salary: String,
}

impl JobRecord {
    /// Apply detail-page data. Description, salary and apply type always come
    /// from the detail page; criteria only overwrite when the page had them.
    pub fn merge_details(&mut self, details: JobDetails) {
        self.description = details.description;
        self.salary = details.salary;
        self.apply_type = details.apply_type;

        for (slot, value) in [
            (&mut self.experience_level, details.experience_level),
            (&mut self.contract_type, details.contract_type),
            (&mut self.work_type, details.work_type),
            (&mut self.sector, details.sector),
        ] {
            if !value.is_empty() {
                *slot = value;
            }
        }
    }

    /// Posting age in minutes, `999_999` when the label is not understood
    pub fn posted_minutes(&self) -> u64 {
        parse_time_to_minutes(&self.posted_time)
    }

    pub fn applicant_count(&self) -> u64 {
        parse_applicant_count(&self.applications_count)
    }

    /// Key used to order results: freshest first, then least contested.
    pub fn sort_key(&self) -> (u64, u64) {
        (self.posted_minutes(), self.applicant_count())
    }
}
