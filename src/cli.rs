// src/cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use crate::core::{ConfigManager, FsOps};
use crate::linkedin::{
    parse_job_detail, parse_job_list, ApplyFilter, ExperienceLevel, JobType, SearchQuery,
    TimePeriod,
};
use crate::types::ApplyType;
use crate::{format_preview, JobScout, RunReport};

#[derive(Parser)]
#[command(name = "jobscout")]
#[command(about = "Scrape public LinkedIn job listings into JSON and CSV")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Also write JSON logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run every search of a campaign config file
    Run {
        /// YAML or TOML config (defaults to $JOBSCOUT_CONFIG or config.yaml)
        #[arg(long, short)]
        config: Option<PathBuf>,
    },
    /// Run a single search
    Search {
        #[arg(long)]
        keywords: String,
        #[arg(long)]
        location: String,
        #[arg(long, value_enum, default_value = "any-time")]
        time_period: TimePeriod,
        #[arg(long, value_enum)]
        experience: Option<ExperienceLevel>,
        #[arg(long, value_enum)]
        job_type: Option<JobType>,
        /// Number of jobs to collect
        #[arg(long, default_value_t = 100)]
        limit: usize,
        /// Keep only jobs with this apply type
        #[arg(long, value_enum)]
        apply_type: Option<ApplyType>,
        /// Optional config file for HTTP, delay and output settings
        #[arg(long, short)]
        config: Option<PathBuf>,
        #[arg(long)]
        output_dir: Option<PathBuf>,
        #[arg(long)]
        stem: Option<String>,
    },
    /// Parse a saved HTML page and print the result as JSON
    Parse {
        #[command(subcommand)]
        page: ParseTarget,
    },
}

#[derive(Subcommand)]
pub enum ParseTarget {
    /// A search-result page
    List { file: PathBuf },
    /// A job detail page
    Detail { file: PathBuf },
}

async fn load_config(path: Option<PathBuf>, required: bool) -> Result<ConfigManager> {
    match path {
        Some(path) => ConfigManager::load(&path).await,
        None => {
            let path = ConfigManager::default_path();
            if required || path.exists() {
                ConfigManager::load(&path).await
            } else {
                let mut config = ConfigManager::default();
                config.apply_env_overrides();
                config.resolve_paths()?;
                Ok(config)
            }
        }
    }
}

fn report(report: &RunReport, preview_count: usize) {
    match &report.files {
        Some(files) => {
            println!(
                "\nSuccessfully scraped and saved {} jobs to '{}' and '{}'",
                report.jobs.len(),
                files.json.display(),
                files.csv.display()
            );
            println!(
                "\n--- Top {} Job Listings (sorted by time, then applicants) ---",
                preview_count.min(report.jobs.len())
            );
            print!("{}", format_preview(&report.jobs, preview_count));
        }
        None => println!("\nNo jobs found matching your criteria or an error occurred during scraping."),
    }
}

pub async fn handle_command(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run { config } => {
            let config = load_config(config, true).await?;
            let preview_count = config.output.preview_count;
            let scout = JobScout::new(config).await?;
            let run = scout.run_campaign().await?;
            report(&run, preview_count);
        }

        Command::Search {
            keywords,
            location,
            time_period,
            experience,
            job_type,
            limit,
            apply_type,
            config,
            output_dir,
            stem,
        } => {
            let mut config = load_config(config, false).await?;
            if let Some(dir) = output_dir {
                config.output.directory = dir;
                config.resolve_paths()?;
            }
            if let Some(stem) = stem {
                config.output.file_stem = stem;
            }
            let preview_count = config.output.preview_count;

            let query = SearchQuery::new(&keywords, &location)
                .with_time_period(time_period)
                .with_experience_level(experience)
                .with_job_type(job_type);
            info!("Attempting to scrape up to {} jobs for '{}' in '{}'", limit, keywords, location);

            let scout = JobScout::new(config).await?;
            let run = scout
                .run_search(&query, limit, ApplyFilter::from(apply_type))
                .await?;
            report(&run, preview_count);
        }

        Command::Parse { page } => {
            let json = match page {
                ParseTarget::List { file } => {
                    let html = FsOps::read_file_safe(&file).await?;
                    serde_json::to_string_pretty(&parse_job_list(&html))
                }
                ParseTarget::Detail { file } => {
                    let html = FsOps::read_file_safe(&file).await?;
                    serde_json::to_string_pretty(&parse_job_detail(&html))
                }
            }
            .context("Failed to serialize parse result")?;
            println!("{}", json);
        }
    }

    Ok(())
}
