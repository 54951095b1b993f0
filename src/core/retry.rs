// src/core/retry.rs
//! Retry policy and per-attempt outcome classification for page fetches

use rand::Rng;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

use crate::utils::saturating_secs;

/// Why a fetch did not produce a page.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("rate limited (HTTP 429)")]
    RateLimited,
    #[error("HTTP {0}")]
    Status(u16),
    #[error("failed to build HTTP client: {0}")]
    Client(String),
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: Box<FetchError> },
}

impl FetchError {
    /// Errors that suggest the proxy in use is unhealthy
    pub fn implicates_proxy(&self) -> bool {
        matches!(self, FetchError::Timeout | FetchError::Connection(_))
    }
}

/// Result of a single HTTP attempt.
#[derive(Debug)]
pub enum AttemptOutcome {
    Success(String),
    Retryable(FetchError),
    Fatal(FetchError),
}

/// Classify a response status. The body is only read for successes.
pub fn classify_status(status: StatusCode) -> Option<AttemptOutcome> {
    if status.is_success() {
        return None;
    }
    let outcome = match status.as_u16() {
        429 => AttemptOutcome::Retryable(FetchError::RateLimited),
        code @ 500..=599 => AttemptOutcome::Retryable(FetchError::Status(code)),
        code => AttemptOutcome::Fatal(FetchError::Status(code)),
    };
    Some(outcome)
}

/// Classify a transport-level error. Every transport failure is retried.
pub fn classify_transport(error: &reqwest::Error) -> AttemptOutcome {
    let kind = if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_connect() {
        FetchError::Connection(error.to_string())
    } else {
        FetchError::Transport(error.to_string())
    };
    AttemptOutcome::Retryable(kind)
}

/// Bounded retry with exponential backoff.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first
    pub max_attempts: u32,
    pub base_delay_secs: f64,
    pub backoff_factor: f64,
    /// Upper bound of the uniform jitter added to each backoff
    pub max_jitter_secs: f64,
    pub rate_limit_cooldown_secs: f64,
    pub timeout_secs: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 5.0,
            backoff_factor: 2.0,
            max_jitter_secs: 1.0,
            rate_limit_cooldown_secs: 60.0,
            timeout_secs: 20,
        }
    }
}

impl RetryPolicy {
    /// Delay before 0-based `attempt`: nothing for the first, then
    /// `base * factor^(attempt - 1) + jitter`.
    pub fn backoff_delay(&self, attempt: u32, jitter_secs: f64) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let exp = attempt.saturating_sub(1).min(16) as i32;
        saturating_secs(self.base_delay_secs * self.backoff_factor.powi(exp) + jitter_secs)
    }

    pub fn rate_limit_cooldown(&self) -> Duration {
        saturating_secs(self.rate_limit_cooldown_secs)
    }

    /// Uniform jitter in `0..=max_jitter_secs`, zero when the bound is unusable
    pub fn sample_jitter(&self) -> f64 {
        let max = self.max_jitter_secs;
        if max.is_finite() && max > 0.0 {
            rand::thread_rng().gen_range(0.0..=max)
        } else {
            0.0
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
