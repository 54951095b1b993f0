// src/linkedin/search.rs
//! Search filters and their encoding as guest-API query parameters

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::types::ApplyType;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TimePeriod {
    #[default]
    #[serde(alias = "Any time")]
    AnyTime,
    #[serde(alias = "Past 24 hours")]
    Past24Hours,
    #[serde(alias = "Past week")]
    PastWeek,
    #[serde(alias = "Past month")]
    PastMonth,
}

impl TimePeriod {
    /// Value of the `f_TPR` parameter, `None` for no restriction
    pub fn code(&self) -> Option<&'static str> {
        match self {
            TimePeriod::AnyTime => None,
            TimePeriod::Past24Hours => Some("r86400"),
            TimePeriod::PastWeek => Some("r604800"),
            TimePeriod::PastMonth => Some("r2592000"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    #[serde(alias = "Internship")]
    Internship,
    #[serde(alias = "Entry level")]
    EntryLevel,
    #[serde(alias = "Associate")]
    Associate,
    #[serde(alias = "Mid-Senior level")]
    MidSenior,
    #[serde(alias = "Director")]
    Director,
    #[serde(alias = "Executive")]
    Executive,
}

impl ExperienceLevel {
    /// Value of the `f_E` parameter
    pub fn code(&self) -> &'static str {
        match self {
            ExperienceLevel::Internship => "1",
            ExperienceLevel::EntryLevel => "2",
            ExperienceLevel::Associate => "3",
            ExperienceLevel::MidSenior => "4",
            ExperienceLevel::Director => "5",
            ExperienceLevel::Executive => "6",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    #[serde(alias = "Full-time")]
    FullTime,
    #[serde(alias = "Part-time")]
    PartTime,
    #[serde(alias = "Contract")]
    Contract,
    #[serde(alias = "Temporary")]
    Temporary,
    #[serde(alias = "Internship")]
    Internship,
}

impl JobType {
    /// Value of the `f_JT` parameter
    pub fn code(&self) -> &'static str {
        match self {
            JobType::FullTime => "F",
            JobType::PartTime => "P",
            JobType::Contract => "C",
            JobType::Temporary => "T",
            JobType::Internship => "I",
        }
    }
}

/// Which apply types a search keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApplyFilter {
    #[default]
    Any,
    Only(ApplyType),
}

impl ApplyFilter {
    pub fn accepts(&self, apply_type: ApplyType) -> bool {
        match self {
            ApplyFilter::Any => true,
            ApplyFilter::Only(wanted) => *wanted == apply_type,
        }
    }
}

impl From<Option<ApplyType>> for ApplyFilter {
    fn from(value: Option<ApplyType>) -> Self {
        value.map(ApplyFilter::Only).unwrap_or_default()
    }
}

/// One search against the listing endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub keywords: String,
    pub location: String,
    pub time_period: TimePeriod,
    pub experience_level: Option<ExperienceLevel>,
    pub job_type: Option<JobType>,
}

impl SearchQuery {
    pub fn new(keywords: &str, location: &str) -> Self {
        Self {
            keywords: keywords.to_string(),
            location: location.to_string(),
            ..Default::default()
        }
    }

    pub fn with_time_period(mut self, time_period: TimePeriod) -> Self {
        self.time_period = time_period;
        self
    }

    pub fn with_experience_level(mut self, level: Option<ExperienceLevel>) -> Self {
        self.experience_level = level;
        self
    }

    pub fn with_job_type(mut self, job_type: Option<JobType>) -> Self {
        self.job_type = job_type;
        self
    }

    /// Query parameters for the page starting at result offset `start`
    pub fn params(&self, start: usize) -> Vec<(String, String)> {
        let mut params = vec![
            ("keywords".to_string(), self.keywords.clone()),
            ("location".to_string(), self.location.clone()),
        ];
        if let Some(code) = self.time_period.code() {
            params.push(("f_TPR".to_string(), code.to_string()));
        }
        if let Some(level) = self.experience_level {
            params.push(("f_E".to_string(), level.code().to_string()));
        }
        if let Some(job_type) = self.job_type {
            params.push(("f_JT".to_string(), job_type.code().to_string()));
        }
        params.push(("start".to_string(), start.to_string()));
        params
    }
}
