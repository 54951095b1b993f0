// src/linkedin/orchestrator.rs
//! Paginated search: list pages, detail pages, filtering, ordering

use rand::Rng;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error, info};

use super::client::JobSource;
use super::detail_parser::parse_job_detail;
use super::list_parser::parse_job_list;
use super::search::{ApplyFilter, SearchQuery};
use crate::types::JobRecord;
use crate::utils::saturating_secs;

/// Cards per guest search page
pub const PAGE_SIZE: usize = 25;

/// Uniform random pause between `min_secs` and `max_secs`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DelayRange {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl DelayRange {
    pub const fn new(min_secs: f64, max_secs: f64) -> Self {
        Self { min_secs, max_secs }
    }

    pub const ZERO: DelayRange = DelayRange::new(0.0, 0.0);

    pub fn is_valid(&self) -> bool {
        self.min_secs.is_finite()
            && self.max_secs.is_finite()
            && self.min_secs >= 0.0
            && self.min_secs <= self.max_secs
    }

    pub fn sample(&self) -> Duration {
        if !self.is_valid() || self.max_secs <= self.min_secs {
            return saturating_secs(self.min_secs);
        }
        let secs = rand::thread_rng().gen_range(self.min_secs..=self.max_secs);
        saturating_secs(secs)
    }

    pub async fn wait(&self, what: &str) {
        let delay = self.sample();
        if !delay.is_zero() {
            debug!("Waiting {:.2}s ({})", delay.as_secs_f64(), what);
            tokio::time::sleep(delay).await;
        }
    }
}

/// Courtesy pauses between outbound requests.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PolitenessDelays {
    /// After each search-result page
    pub page: DelayRange,
    /// After each detail fetch, accepted or not
    pub detail: DelayRange,
    /// Extra pause after a record is accepted
    pub accepted: DelayRange,
    /// Between the searches of a campaign
    pub between_searches: DelayRange,
}

impl Default for PolitenessDelays {
    fn default() -> Self {
        Self {
            page: DelayRange::new(2.0, 4.0),
            detail: DelayRange::new(0.5, 1.5),
            accepted: DelayRange::new(1.5, 3.5),
            between_searches: DelayRange::new(5.0, 10.0),
        }
    }
}

impl PolitenessDelays {
    pub fn none() -> Self {
        Self {
            page: DelayRange::ZERO,
            detail: DelayRange::ZERO,
            accepted: DelayRange::ZERO,
            between_searches: DelayRange::ZERO,
        }
    }

    pub fn all(&self) -> [(&'static str, DelayRange); 4] {
        [
            ("page", self.page),
            ("detail", self.detail),
            ("accepted", self.accepted),
            ("between_searches", self.between_searches),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    LimitReached,
    PageFetchFailed,
    EmptyPages,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub jobs: Vec<JobRecord>,
    pub pages_fetched: usize,
    pub stop_reason: StopReason,
}

/// Stable ascending order on (posting age in minutes, applicant count)
pub fn sort_jobs(jobs: &mut [JobRecord]) {
    jobs.sort_by_cached_key(JobRecord::sort_key);
}

/// Keep one record per job URL, preferring the longer description.
/// First-seen order is preserved.
pub fn dedup_by_url(jobs: Vec<JobRecord>) -> Vec<JobRecord> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<JobRecord> = Vec::with_capacity(jobs.len());

    for job in jobs {
        match positions.get(&job.job_url) {
            Some(&idx) => {
                if job.description.chars().count() > unique[idx].description.chars().count() {
                    unique[idx] = job;
                }
            }
            None => {
                positions.insert(job.job_url.clone(), unique.len());
                unique.push(job);
            }
        }
    }

    unique
}

pub struct SearchOrchestrator<S> {
    source: S,
    delays: PolitenessDelays,
    max_empty_pages: u32,
}

impl<S: JobSource> SearchOrchestrator<S> {
    pub fn new(source: S, delays: PolitenessDelays, max_empty_pages: u32) -> Self {
        Self {
            source,
            delays,
            max_empty_pages: max_empty_pages.max(1),
        }
    }

    pub fn delays(&self) -> &PolitenessDelays {
        &self.delays
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Collect up to `limit` records passing `filter`, sorted and truncated.
    pub async fn search(&mut self, query: &SearchQuery, limit: usize, filter: ApplyFilter) -> SearchOutcome {
        let mut accepted: Vec<JobRecord> = Vec::new();
        let mut start = 0usize;
        let mut pages_fetched = 0usize;
        let mut empty_streak = 0u32;
        let mut stop_reason = StopReason::LimitReached;

        while accepted.len() < limit {
            info!(
                "Fetching jobs page starting at index {} for '{}' in '{}' ({}/{} collected)",
                start,
                query.keywords,
                query.location,
                accepted.len(),
                limit
            );

            let Some(html) = self.source.fetch_search_page(query, start).await else {
                error!("Failed to get job list page for '{}'. Ending this search.", query.location);
                stop_reason = StopReason::PageFetchFailed;
                break;
            };
            pages_fetched += 1;

            let cards = parse_job_list(&html);
            if cards.is_empty() {
                empty_streak += 1;
                info!(
                    "No job listings on page {} ({} consecutive empty)",
                    start / PAGE_SIZE + 1,
                    empty_streak
                );
                if empty_streak >= self.max_empty_pages {
                    stop_reason = StopReason::EmptyPages;
                    break;
                }
                start += PAGE_SIZE;
                self.delays.page.wait("page").await;
                continue;
            }
            empty_streak = 0;

            let cards_on_page = cards.len();
            for mut job in cards {
                if accepted.len() >= limit {
                    break;
                }

                info!("Checking details for: '{}' at '{}'", job.title, job.company_name);
                match self.source.fetch_job_detail(&job.job_url).await {
                    Some(detail_html) => job.merge_details(parse_job_detail(&detail_html)),
                    None => debug!(
                        "Keeping list-page data for {} (apply type hint {})",
                        job.job_url, job.apply_type
                    ),
                }

                if filter.accepts(job.apply_type) {
                    info!("Accepted '{}' ({})", job.title, job.apply_type);
                    accepted.push(job);
                    self.delays.accepted.wait("accepted").await;
                } else {
                    debug!("Skipping '{}' (apply type {})", job.title, job.apply_type);
                }

                self.delays.detail.wait("detail").await;
            }

            start += cards_on_page;
            self.delays.page.wait("page").await;
        }

        info!(
            "Finished search for '{}' in '{}': {} jobs collected",
            query.keywords,
            query.location,
            accepted.len()
        );

        sort_jobs(&mut accepted);
        accepted.truncate(limit);

        SearchOutcome {
            jobs: accepted,
            pages_fetched,
            stop_reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(url: &str, posted: &str, applicants: &str, description: &str) -> JobRecord {
        JobRecord {
            job_url: url.to_string(),
            posted_time: posted.to_string(),
            applications_count: applicants.to_string(),
            description: description.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_sort_by_minutes_then_applicants() {
        let mut jobs = vec![
            job("a", "1 hour ago", "1 applicant", ""),
            job("b", "10 minutes ago", "5 applicants", ""),
            job("c", "10 minutes ago", "2 applicants", ""),
        ];
        sort_jobs(&mut jobs);
        let keys: Vec<_> = jobs.iter().map(JobRecord::sort_key).collect();
        assert_eq!(keys, [(10, 2), (10, 5), (60, 1)]);
    }

    #[test]
    fn test_sort_is_stable_and_unparseable_last() {
        let mut jobs = vec![
            job("x", "recently", "", ""),
            job("first", "2 days ago", "3 applicants", ""),
            job("second", "2 days ago", "3 applicants", ""),
        ];
        sort_jobs(&mut jobs);
        let urls: Vec<_> = jobs.iter().map(|j| j.job_url.as_str()).collect();
        assert_eq!(urls, ["first", "second", "x"]);
    }

    #[test]
    fn test_dedup_keeps_longer_description() {
        let jobs = vec![
            job("u1", "", "", "short"),
            job("u2", "", "", "other"),
            job("u1", "", "", "a much longer description"),
            job("u1", "", "", "tiny"),
        ];
        let unique = dedup_by_url(jobs);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].job_url, "u1");
        assert_eq!(unique[0].description, "a much longer description");
        assert_eq!(unique[1].job_url, "u2");
    }

    #[test]
    fn test_dedup_tie_keeps_first() {
        let unique = dedup_by_url(vec![job("u", "1 day ago", "", "same"), job("u", "2 days ago", "", "same")]);
        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0].posted_time, "1 day ago");
    }

    #[test]
    fn test_delay_range() {
        assert_eq!(DelayRange::ZERO.sample(), Duration::ZERO);
        let range = DelayRange::new(0.01, 0.02);
        let d = range.sample();
        assert!(d >= Duration::from_secs_f64(0.01) && d <= Duration::from_secs_f64(0.02));
        assert!(!DelayRange::new(3.0, 1.0).is_valid());
    }

    #[test]
    fn test_unbounded_delay_range_does_not_panic() {
        let range = DelayRange::new(0.0, f64::INFINITY);
        assert!(!range.is_valid());
        assert_eq!(range.sample(), Duration::ZERO);
        assert_eq!(DelayRange::new(1e300, 1e300).sample(), Duration::MAX);
        assert_eq!(DelayRange::new(f64::NAN, 1.0).sample(), Duration::ZERO);
    }
}
