// src/core/exporter.rs
//! JSON and CSV export of collected job records

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::FsOps;
use crate::types::JobRecord;
use crate::utils::output_file_path;

/// Paths written by [`Exporter::export`]
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFiles {
    pub json: PathBuf,
    pub csv: PathBuf,
}

pub struct Exporter;

impl Exporter {
    /// Write an indented UTF-8 JSON array. No-op when `jobs` is empty.
    pub async fn write_json(path: &Path, jobs: &[JobRecord]) -> Result<bool> {
        if jobs.is_empty() {
            warn!("No jobs to save to JSON.");
            return Ok(false);
        }

        let content = serde_json::to_string_pretty(jobs).context("Failed to serialize jobs to JSON")?;
        FsOps::write_file_safe(path, &content).await?;

        info!("Successfully saved {} jobs to {}", jobs.len(), path.display());
        Ok(true)
    }

    /// Write a CSV with a header row taken from the record fields. No-op when `jobs` is empty.
    pub async fn write_csv(path: &Path, jobs: &[JobRecord]) -> Result<bool> {
        if jobs.is_empty() {
            warn!("No jobs to save to CSV.");
            return Ok(false);
        }

        let mut writer = csv::Writer::from_writer(Vec::new());
        for job in jobs {
            writer.serialize(job).context("Failed to serialize job to CSV")?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e))?;
        let content = String::from_utf8(bytes).context("CSV output is not valid UTF-8")?;
        FsOps::write_file_safe(path, &content).await?;

        info!("Successfully saved {} jobs to {}", jobs.len(), path.display());
        Ok(true)
    }

    /// Write `<stem>.json` and `<stem>.csv` into `dir`
    pub async fn export(
        dir: &Path,
        stem: &str,
        timestamped: bool,
        jobs: &[JobRecord],
    ) -> Result<Option<ExportedFiles>> {
        if jobs.is_empty() {
            warn!("Nothing to export to {}", dir.display());
            return Ok(None);
        }

        let files = ExportedFiles {
            json: output_file_path(dir, stem, "json", timestamped),
            csv: output_file_path(dir, stem, "csv", timestamped),
        };

        Self::write_json(&files.json, jobs).await?;
        Self::write_csv(&files.csv, jobs).await?;

        Ok(Some(files))
    }
}
