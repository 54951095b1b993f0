// src/core/requester.rs
//! HTTP GET with user-agent rotation, proxy rotation and bounded retries

use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, USER_AGENT};
use reqwest::Client;
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

use super::proxy_rotator::ProxyRotator;
use super::retry::{classify_status, classify_transport, AttemptOutcome, FetchError, RetryPolicy};

const USER_AGENTS: [&str; 5] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:122.0) Gecko/20100101 Firefox/122.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_3_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.3.1 Mobile/15E148 Safari/604.1",
];

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers
}

pub fn random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS[rng.gen_range(0..USER_AGENTS.len())]
}

pub struct Requester {
    direct: Client,
    proxied: HashMap<String, Client>,
    proxies: ProxyRotator,
    policy: RetryPolicy,
}

impl Requester {
    pub fn new(policy: RetryPolicy, proxies: ProxyRotator) -> Result<Self, FetchError> {
        let direct = Self::build_client(&policy, None)?;
        Ok(Self {
            direct,
            proxied: HashMap::new(),
            proxies,
            policy,
        })
    }

    fn build_client(policy: &RetryPolicy, proxy: Option<&str>) -> Result<Client, FetchError> {
        let builder = Client::builder()
            .timeout(policy.timeout())
            .default_headers(default_headers());

        let builder = match proxy {
            Some(endpoint) => builder.proxy(
                reqwest::Proxy::all(endpoint).map_err(|e| FetchError::Client(e.to_string()))?,
            ),
            None => builder.no_proxy(),
        };

        builder.build().map_err(|e| FetchError::Client(e.to_string()))
    }

    fn client_for(&mut self, proxy: Option<&str>) -> Result<Client, FetchError> {
        let Some(endpoint) = proxy else {
            return Ok(self.direct.clone());
        };
        if let Some(client) = self.proxied.get(endpoint) {
            return Ok(client.clone());
        }
        let client = Self::build_client(&self.policy, Some(endpoint))?;
        self.proxied.insert(endpoint.to_string(), client.clone());
        Ok(client)
    }

    async fn attempt(&mut self, url: &str, params: &[(String, String)], proxy: Option<&str>) -> AttemptOutcome {
        let client = match self.client_for(proxy) {
            Ok(client) => client,
            Err(e) => return AttemptOutcome::Fatal(e),
        };

        let response = client
            .get(url)
            .query(params)
            .header(USER_AGENT, random_user_agent())
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => return classify_transport(&e),
        };

        let status = response.status();
        if let Some(outcome) = classify_status(status) {
            return outcome;
        }

        match response.text().await {
            Ok(body) => AttemptOutcome::Success(body),
            Err(e) => classify_transport(&e),
        }
    }

    /// Fetch `url` with query `params`. Any error means this unit of work
    /// should be skipped; it is never fatal to a whole run.
    pub async fn fetch(&mut self, url: &str, params: &[(String, String)]) -> Result<String, FetchError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 0..max_attempts {
            let proxy = self.proxies.next();

            if attempt > 0 {
                let delay = self.policy.backoff_delay(attempt, self.policy.sample_jitter());
                info!("Retrying request to {} in {:.2} seconds...", url, delay.as_secs_f64());
                tokio::time::sleep(delay).await;
            }

            debug!("GET {} (attempt {}/{})", url, attempt + 1, max_attempts);

            match self.attempt(url, params, proxy.as_deref()).await {
                AttemptOutcome::Success(body) => return Ok(body),
                AttemptOutcome::Fatal(e) => {
                    error!("Request to {} failed permanently: {}", url, e);
                    return Err(e);
                }
                AttemptOutcome::Retryable(FetchError::RateLimited) => {
                    let cooldown = self.policy.rate_limit_cooldown();
                    warn!(
                        "Rate limit hit (429). Waiting for {} seconds.",
                        cooldown.as_secs_f64()
                    );
                    tokio::time::sleep(cooldown).await;
                    last_error = Some(FetchError::RateLimited);
                }
                AttemptOutcome::Retryable(e) => {
                    error!("Request failed on attempt {}: {}", attempt + 1, e);
                    if let Some(endpoint) = proxy.as_deref() {
                        if e.implicates_proxy() {
                            self.proxies.mark_failed(endpoint);
                        }
                    }
                    last_error = Some(e);
                }
            }
        }

        error!("Failed to fetch URL after {} attempts: {}", max_attempts, url);
        Err(FetchError::Exhausted {
            attempts: max_attempts,
            last: Box::new(last_error.unwrap_or(FetchError::Transport("no attempt made".to_string()))),
        })
    }
}
