// src/linkedin/campaign.rs
//! Several searches across locations, merged into one ranked list

use serde::Deserialize;
use tracing::info;

use super::client::JobSource;
use super::orchestrator::{dedup_by_url, sort_jobs, SearchOrchestrator};
use super::search::{ApplyFilter, ExperienceLevel, JobType, SearchQuery, TimePeriod};
use crate::types::{ApplyType, JobRecord};

/// One keyword profile searched in every campaign location.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchProfile {
    pub label: String,
    pub keywords: String,
    #[serde(default)]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default)]
    pub job_type: Option<JobType>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CampaignConfig {
    pub locations: Vec<String>,
    pub searches: Vec<SearchProfile>,
    pub time_period: TimePeriod,
    /// Keep only postings with this apply type
    pub apply_type: Option<ApplyType>,
    /// Cap on the merged, deduplicated result
    pub total_target: usize,
    pub min_per_search: usize,
    pub per_search_bonus: usize,
    pub max_empty_pages: u32,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            locations: Vec::new(),
            searches: Vec::new(),
            time_period: TimePeriod::AnyTime,
            apply_type: None,
            total_target: 100,
            min_per_search: 10,
            per_search_bonus: 5,
            max_empty_pages: 1,
        }
    }
}

impl CampaignConfig {
    pub fn search_count(&self) -> usize {
        self.locations.len() * self.searches.len()
    }

    /// Limit for each location/profile search so the combined results
    /// comfortably cover `total_target`.
    pub fn per_search_limit(&self) -> usize {
        let spread = self.total_target / self.search_count().max(1) + self.per_search_bonus;
        spread.max(self.min_per_search)
    }

    pub fn apply_filter(&self) -> ApplyFilter {
        ApplyFilter::from(self.apply_type)
    }

    pub fn query(&self, profile: &SearchProfile, location: &str) -> SearchQuery {
        SearchQuery::new(&profile.keywords, location)
            .with_time_period(self.time_period)
            .with_experience_level(profile.experience_level)
            .with_job_type(profile.job_type)
    }
}

/// Tag attached to records produced by one campaign search
pub fn search_label(profile: &SearchProfile, location: &str) -> String {
    format!("{} ({})", profile.label, location)
}

/// Finalize merged campaign output: dedup by URL, sort, cap.
pub fn finalize(jobs: Vec<JobRecord>, total_target: usize) -> Vec<JobRecord> {
    let mut unique = dedup_by_url(jobs);
    sort_jobs(&mut unique);
    unique.truncate(total_target);
    unique
}

pub async fn run_campaign<S: JobSource>(
    orchestrator: &mut SearchOrchestrator<S>,
    config: &CampaignConfig,
) -> Vec<JobRecord> {
    let limit = config.per_search_limit();
    let filter = config.apply_filter();
    let between_searches = orchestrator.delays().between_searches;
    let mut collected = Vec::new();

    info!(
        "Starting campaign: {} locations x {} searches, {} per search, target {}",
        config.locations.len(),
        config.searches.len(),
        limit,
        config.total_target
    );

    for location in &config.locations {
        info!("Searching in: {}", location);
        for profile in &config.searches {
            let label = search_label(profile, location);
            info!("--- Starting search: {} ---", label);

            let query = config.query(profile, location);
            let outcome = orchestrator.search(&query, limit, filter).await;
            info!(
                "Search '{}' returned {} jobs over {} pages ({:?})",
                label,
                outcome.jobs.len(),
                outcome.pages_fetched,
                outcome.stop_reason
            );

            collected.extend(outcome.jobs.into_iter().map(|mut job| {
                job.search_config = label.clone();
                job
            }));

            between_searches.wait("between searches").await;
        }
    }

    let total = collected.len();
    let jobs = finalize(collected, config.total_target);
    info!("Campaign collected {} jobs, {} after dedup and cap", total, jobs.len());
    jobs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(label: &str) -> SearchProfile {
        SearchProfile {
            label: label.to_string(),
            keywords: "FP&A".to_string(),
            experience_level: Some(ExperienceLevel::Associate),
            job_type: None,
        }
    }

    #[test]
    fn test_per_search_limit() {
        let mut config = CampaignConfig {
            locations: vec!["Pune".into(), "Bangalore".into(), "Mumbai".into()],
            searches: (0..6).map(|i| profile(&format!("p{}", i))).collect(),
            ..Default::default()
        };
        // 100 / 18 + 5 = 10
        assert_eq!(config.per_search_limit(), 10);

        config.total_target = 400;
        // 400 / 18 + 5 = 27
        assert_eq!(config.per_search_limit(), 27);

        config.total_target = 10;
        assert_eq!(config.per_search_limit(), 10);
    }

    #[test]
    fn test_query_and_label() {
        let config = CampaignConfig {
            time_period: TimePeriod::PastWeek,
            ..Default::default()
        };
        let p = profile("Primary FP&A (Associate)");
        let query = config.query(&p, "Pune, Maharashtra, India");

        assert_eq!(query.experience_level, Some(ExperienceLevel::Associate));
        assert_eq!(query.time_period, TimePeriod::PastWeek);
        assert_eq!(
            search_label(&p, "Pune, Maharashtra, India"),
            "Primary FP&A (Associate) (Pune, Maharashtra, India)"
        );
    }

    #[test]
    fn test_finalize_caps_after_dedup() {
        let jobs: Vec<JobRecord> = ["a", "b", "a", "c"]
            .iter()
            .enumerate()
            .map(|(i, url)| JobRecord {
                job_url: url.to_string(),
                posted_time: format!("{} hours ago", 4 - i),
                ..Default::default()
            })
            .collect();

        let out = finalize(jobs, 2);
        let urls: Vec<_> = out.iter().map(|j| j.job_url.as_str()).collect();
        // c: 1h, b: 3h, a kept at first-seen 4h
        assert_eq!(urls, ["c", "b"]);
    }
}
