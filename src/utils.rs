// src/utils.rs
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

/// Sort value given to postings whose age label cannot be parsed
pub const UNPARSEABLE_MINUTES: u64 = 999_999;

static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)").expect("valid number pattern"));

fn first_number(text: &str) -> Option<u64> {
    FIRST_NUMBER
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok())
}

/// Convert a relative age label ("3 hours ago", "1 week ago") to minutes
pub fn parse_time_to_minutes(label: &str) -> u64 {
    let label = label.to_lowercase();
    let Some(n) = first_number(&label) else {
        return UNPARSEABLE_MINUTES;
    };

    let unit = if label.contains("minute") {
        1
    } else if label.contains("hour") {
        60
    } else if label.contains("day") {
        1_440
    } else if label.contains("week") {
        10_080
    } else if label.contains("month") {
        43_200
    } else {
        return UNPARSEABLE_MINUTES;
    };

    n.checked_mul(unit).unwrap_or(UNPARSEABLE_MINUTES)
}

/// Parse an applicant label ("Be among the first 25 applicants", "Over 200 applicants")
pub fn parse_applicant_count(label: &str) -> u64 {
    let label = label.to_lowercase();
    if let Some(rest) = label
        .find("be among the first")
        .map(|idx| &label[idx..])
    {
        if let Some(n) = first_number(rest) {
            return n;
        }
    }
    first_number(&label).unwrap_or(0)
}

/// Parse a CSS selector written into the source
pub fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector parses")
}

/// Seconds to a `Duration`. Negative and NaN give zero, overflow saturates.
pub fn saturating_secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value.max(0.0)).unwrap_or(Duration::MAX)
}

/// All text under an element, trimmed
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Visible text nodes of an element, each trimmed, empty ones dropped
pub fn element_text_joined(element: ElementRef<'_>, separator: &str) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Build an export file path, optionally stamped with the current UTC time
pub fn output_file_path(dir: &Path, stem: &str, extension: &str, timestamped: bool) -> PathBuf {
    let name = if timestamped {
        format!(
            "{}_{}.{}",
            stem,
            chrono::Utc::now().format("%Y%m%d_%H%M%S"),
            extension
        )
    } else {
        format!("{}.{}", stem, extension)
    };
    dir.join(name)
}

/// Resolve a possibly relative path against the current working directory
pub fn resolve_path(path: &Path) -> anyhow::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        let current_dir = std::env::current_dir()
            .map_err(|e| anyhow::anyhow!("Failed to get current directory: {}", e))?;
        Ok(current_dir.join(path))
    }
}
