use anyhow::{Context, Result};
use std::fmt::Write as _;

pub mod cli;
pub mod core;
pub mod linkedin;
pub mod types;
pub mod utils;

use crate::core::{ConfigManager, ExportedFiles, Exporter, ProxyRotator, Requester};
use crate::linkedin::{
    run_campaign, ApplyFilter, LinkedInClient, SearchOrchestrator, SearchOutcome, SearchQuery,
};
use crate::types::JobRecord;

/// Result of a finished run
#[derive(Debug)]
pub struct RunReport {
    pub jobs: Vec<JobRecord>,
    pub files: Option<ExportedFiles>,
}

/// Scraper front end: wires configuration, HTTP client and export together
pub struct JobScout {
    pub config: ConfigManager,
}

impl JobScout {
    /// Validate configuration and create the output directory.
    /// Nothing touches the network before this succeeds.
    pub async fn new(config: ConfigManager) -> Result<Self> {
        config.validate()?;
        config.ensure_directories().await?;
        Ok(Self { config })
    }

    fn orchestrator(&self) -> Result<SearchOrchestrator<LinkedInClient>> {
        let proxies = ProxyRotator::new(self.config.http.proxies.clone());
        if !proxies.is_empty() {
            tracing::info!("Rotating through {} proxies", proxies.len());
        }
        let requester = Requester::new(self.config.http.retry.clone(), proxies)
            .context("Failed to create HTTP client")?;

        Ok(SearchOrchestrator::new(
            LinkedInClient::new(requester),
            self.config.delays,
            self.config.campaign.max_empty_pages,
        ))
    }

    async fn export(&self, jobs: Vec<JobRecord>) -> Result<RunReport> {
        let output = &self.config.output;
        let files = Exporter::export(&output.directory, &output.file_stem, output.timestamped, &jobs).await?;
        Ok(RunReport { jobs, files })
    }

    /// Run every configured location/search combination
    pub async fn run_campaign(&self) -> Result<RunReport> {
        self.config.validate_campaign()?;
        let mut orchestrator = self.orchestrator()?;
        let jobs = run_campaign(&mut orchestrator, &self.config.campaign).await;
        self.export(jobs).await
    }

    /// Run a single search
    pub async fn run_search(&self, query: &SearchQuery, limit: usize, filter: ApplyFilter) -> Result<RunReport> {
        let mut orchestrator = self.orchestrator()?;
        let SearchOutcome { jobs, stop_reason, .. } = orchestrator.search(query, limit, filter).await;
        tracing::info!("Search stopped: {:?}", stop_reason);
        self.export(jobs).await
    }
}

/// Human-readable summary of the first `count` jobs
pub fn format_preview(jobs: &[JobRecord], count: usize) -> String {
    let mut out = String::new();
    for (i, job) in jobs.iter().take(count).enumerate() {
        let experience = if job.experience_level.is_empty() {
            "N/A"
        } else {
            job.experience_level.as_str()
        };
        let _ = writeln!(out, "\n{}. {} at {}", i + 1, job.title, job.company_name);
        let _ = writeln!(out, "   Location: {}", job.location);
        let _ = writeln!(out, "   Posted: {} ({})", job.posted_time, job.applications_count);
        let _ = writeln!(out, "   Experience: {}", experience);
        let _ = writeln!(out, "   Apply Type: {}", job.apply_type);
        let _ = writeln!(out, "   URL: {}", job.job_url);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ApplyType;

    #[test]
    fn test_format_preview() {
        let jobs = vec![
            JobRecord {
                title: "Financial Analyst".to_string(),
                company_name: "Acme".to_string(),
                posted_time: "1 day ago".to_string(),
                applications_count: "12 applicants".to_string(),
                apply_type: ApplyType::EasyApply,
                job_url: "https://x.test/jobs/view/a-1?x".to_string(),
                ..Default::default()
            },
            JobRecord::default(),
        ];
        let text = format_preview(&jobs, 1);
        assert!(text.contains("1. Financial Analyst at Acme"));
        assert!(text.contains("Posted: 1 day ago (12 applicants)"));
        assert!(text.contains("Experience: N/A"));
        assert!(text.contains("Apply Type: EASY_APPLY"));
        assert!(!text.contains("2."));
    }

    #[tokio::test]
    async fn test_new_fails_when_output_dir_cannot_be_created() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        let mut config = ConfigManager::default();
        config.output.directory = blocker.join("out");
        assert!(JobScout::new(config).await.is_err());
    }
}
