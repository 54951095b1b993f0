// src/linkedin/client.rs
//! Network seam between the search pipeline and the LinkedIn guest endpoints

use tracing::warn;

use super::search::SearchQuery;
use crate::core::retry::FetchError;
use crate::core::Requester;

pub const SEARCH_URL: &str = "https://www.linkedin.com/jobs-guest/jobs/api/seeMoreJobPostings/search";

/// Where the orchestrator gets its markup from. `None` means the unit of
/// work could not be fetched and should be skipped.
#[allow(async_fn_in_trait)]
pub trait JobSource {
    async fn fetch_search_page(&mut self, query: &SearchQuery, start: usize) -> Option<String>;

    async fn fetch_job_detail(&mut self, job_url: &str) -> Option<String>;
}

pub struct LinkedInClient {
    requester: Requester,
    search_url: String,
}

impl LinkedInClient {
    pub fn new(requester: Requester) -> Self {
        Self {
            requester,
            search_url: SEARCH_URL.to_string(),
        }
    }

    pub fn with_search_url(mut self, url: String) -> Self {
        self.search_url = url;
        self
    }

    fn skip(unit: &str, error: FetchError) -> Option<String> {
        warn!("Skipping {}: {}", unit, error);
        None
    }
}

impl JobSource for LinkedInClient {
    async fn fetch_search_page(&mut self, query: &SearchQuery, start: usize) -> Option<String> {
        let params = query.params(start);
        match self.requester.fetch(&self.search_url, &params).await {
            Ok(body) => Some(body),
            Err(e) => Self::skip(&format!("search page at offset {}", start), e),
        }
    }

    async fn fetch_job_detail(&mut self, job_url: &str) -> Option<String> {
        if job_url.is_empty() {
            return None;
        }
        match self.requester.fetch(job_url, &[]).await {
            Ok(body) => Some(body),
            Err(e) => Self::skip(&format!("job detail {}", job_url), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ProxyRotator, RetryPolicy};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// One-shot server that answers with `response` and reports the request line.
    async fn serve_once(response: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let text = String::from_utf8_lossy(&request);
            let _ = tx.send(text.lines().next().unwrap_or_default().to_string());
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        (format!("http://{}/search", addr), rx)
    }

    fn client(url: String) -> LinkedInClient {
        let policy = RetryPolicy {
            max_attempts: 1,
            timeout_secs: 5,
            ..Default::default()
        };
        let requester = Requester::new(policy, ProxyRotator::default()).unwrap();
        LinkedInClient::new(requester).with_search_url(url)
    }

    #[tokio::test]
    async fn test_search_page_sends_query_params() {
        let (url, request_line) =
            serve_once("HTTP/1.1 200 OK\r\nContent-Length: 9\r\nConnection: close\r\n\r\n<ul></ul>").await;
        let mut client = client(url);

        let query = SearchQuery::new("Data Analyst", "Pune");
        let body = client.fetch_search_page(&query, 25).await;
        assert_eq!(body.as_deref(), Some("<ul></ul>"));

        let line = request_line.await.unwrap();
        assert!(line.starts_with("GET /search?keywords=Data+Analyst&location=Pune&start=25 "));
    }

    #[tokio::test]
    async fn test_failed_fetch_is_skipped() {
        let (url, _rx) =
            serve_once("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n").await;
        let mut client = client(url);

        assert!(client.fetch_search_page(&SearchQuery::new("x", "y"), 0).await.is_none());
        assert!(client.fetch_job_detail("").await.is_none());
    }
}
