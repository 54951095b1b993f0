// src/core/config_manager.rs
//! Run configuration: YAML or TOML file, environment overrides, validation

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use super::retry::RetryPolicy;
use super::FsOps;
use crate::linkedin::{CampaignConfig, PolitenessDelays};
use crate::utils::resolve_path;

pub const CONFIG_PATH_VAR: &str = "JOBSCOUT_CONFIG";
pub const OUTPUT_DIR_VAR: &str = "JOBSCOUT_OUTPUT_DIR";
pub const PROXIES_VAR: &str = "JOBSCOUT_PROXIES";

/// Longest single pause any delay setting may ask for
pub const MAX_WAIT_SECS: f64 = 3_600.0;
const MAX_BACKOFF_FACTOR: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match FsOps::get_extension(path).as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            other => anyhow::bail!(
                "Unsupported config format {:?} for {}. Use .yaml, .yml or .toml",
                other,
                path.display()
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub file_stem: String,
    /// Append a UTC timestamp to exported file names
    pub timestamped: bool,
    /// Records printed to stdout after a run
    pub preview_count: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            file_stem: "linkedin_jobs".to_string(),
            timestamped: false,
            preview_count: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(flatten)]
    pub retry: RetryPolicy,
    pub proxies: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigManager {
    pub output: OutputConfig,
    pub http: HttpConfig,
    pub delays: PolitenessDelays,
    pub campaign: CampaignConfig,
}

impl ConfigManager {
    /// Config path from `JOBSCOUT_CONFIG`, else `config.yaml`
    pub fn default_path() -> PathBuf {
        std::env::var(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.yaml"))
    }

    /// Load, apply environment overrides and validate
    pub async fn load(path: &Path) -> Result<Self> {
        info!("Loading configuration from: {}", path.display());

        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let format = ConfigFormat::from_path(path)?;
        let content = FsOps::read_file_safe(path).await?;
        let mut config = Self::parse(&content, format)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        config.apply_env_overrides();
        config.resolve_paths()?;
        config.validate()?;
        Ok(config)
    }

    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content).context("Invalid YAML configuration"),
            ConfigFormat::Toml => toml::from_str(content).context("Invalid TOML configuration"),
        }
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var(OUTPUT_DIR_VAR).ok(),
            std::env::var(PROXIES_VAR).ok(),
        );
    }

    pub fn apply_overrides(&mut self, output_dir: Option<String>, proxies: Option<String>) {
        if let Some(dir) = output_dir.filter(|d| !d.trim().is_empty()) {
            info!("Output directory overridden by {}: {}", OUTPUT_DIR_VAR, dir);
            self.output.directory = PathBuf::from(dir.trim());
        }
        if let Some(list) = proxies {
            self.http.proxies = list
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    pub fn resolve_paths(&mut self) -> Result<()> {
        self.output.directory = resolve_path(&self.output.directory)?;
        Ok(())
    }

    /// Checks that apply to every command
    pub fn validate(&self) -> Result<()> {
        if self.http.retry.max_attempts == 0 {
            anyhow::bail!("http.max_attempts must be at least 1");
        }
        if self.output.file_stem.trim().is_empty() {
            anyhow::bail!("output.file_stem must not be empty");
        }
        let retry = &self.http.retry;
        for (name, value) in [
            ("base_delay_secs", retry.base_delay_secs),
            ("max_jitter_secs", retry.max_jitter_secs),
            ("rate_limit_cooldown_secs", retry.rate_limit_cooldown_secs),
        ] {
            if !(0.0..=MAX_WAIT_SECS).contains(&value) {
                anyhow::bail!("http.{} must be between 0 and {} (got {})", name, MAX_WAIT_SECS, value);
            }
        }
        if !(0.0..=MAX_BACKOFF_FACTOR).contains(&retry.backoff_factor) {
            anyhow::bail!(
                "http.backoff_factor must be between 0 and {} (got {})",
                MAX_BACKOFF_FACTOR,
                retry.backoff_factor
            );
        }
        for (name, range) in self.delays.all() {
            if !range.is_valid() || range.max_secs > MAX_WAIT_SECS {
                anyhow::bail!(
                    "delays.{} must satisfy 0 <= min_secs <= max_secs <= {} (got {} .. {})",
                    name,
                    MAX_WAIT_SECS,
                    range.min_secs,
                    range.max_secs
                );
            }
        }
        Ok(())
    }

    /// Extra checks for a campaign run
    pub fn validate_campaign(&self) -> Result<()> {
        if self.campaign.locations.is_empty() {
            anyhow::bail!("campaign.locations must list at least one location");
        }
        if self.campaign.searches.is_empty() {
            anyhow::bail!("campaign.searches must list at least one search");
        }
        Ok(())
    }

    /// Create the output directory. Fails before any network activity.
    pub async fn ensure_directories(&self) -> Result<()> {
        FsOps::ensure_dir_exists(&self.output.directory)
            .await
            .with_context(|| {
                format!(
                    "Cannot use output directory {}",
                    self.output.directory.display()
                )
            })?;
        info!("Output directory is set to: {}", self.output.directory.display());
        Ok(())
    }
}
