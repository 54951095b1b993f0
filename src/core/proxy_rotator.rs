// src/core/proxy_rotator.rs
//! Round-robin proxy selection with failure tracking

use std::collections::HashSet;
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct ProxyRotator {
    proxies: Vec<String>,
    failed: HashSet<String>,
    index: usize,
}

impl ProxyRotator {
    pub fn new(proxies: Vec<String>) -> Self {
        Self {
            proxies,
            failed: HashSet::new(),
            index: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Next healthy endpoint. When every endpoint has failed the failed set
    /// is cleared and rotation starts over the full list.
    pub fn next(&mut self) -> Option<String> {
        if self.proxies.is_empty() {
            return None;
        }

        let mut available: Vec<&String> = self
            .proxies
            .iter()
            .filter(|p| !self.failed.contains(*p))
            .collect();

        if available.is_empty() {
            warn!("All proxies have failed. Clearing failed list and retrying.");
            self.failed.clear();
            available = self.proxies.iter().collect();
        }

        let proxy = available[self.index % available.len()].clone();
        self.index = self.index.wrapping_add(1);
        Some(proxy)
    }

    pub fn mark_failed(&mut self, proxy: &str) {
        warn!("Marking proxy as failed: {}", proxy);
        self.failed.insert(proxy.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rotator(endpoints: &[&str]) -> ProxyRotator {
        ProxyRotator::new(endpoints.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_empty_list_yields_none() {
        let mut r = ProxyRotator::default();
        assert!(r.is_empty());
        assert_eq!(r.next(), None);
    }

    #[test]
    fn test_round_robin_order() {
        let mut r = rotator(&["http://a:1", "http://b:2", "http://c:3"]);
        let picked: Vec<_> = (0..4).filter_map(|_| r.next()).collect();
        assert_eq!(picked, ["http://a:1", "http://b:2", "http://c:3", "http://a:1"]);
    }

    #[test]
    fn test_failed_proxies_are_skipped() {
        let mut r = rotator(&["http://a:1", "http://b:2"]);
        r.mark_failed("http://a:1");
        assert_eq!(r.next().as_deref(), Some("http://b:2"));
        assert_eq!(r.next().as_deref(), Some("http://b:2"));
        assert_eq!(r.failed_count(), 1);
    }

    #[test]
    fn test_resets_when_all_failed() {
        let mut r = rotator(&["http://a:1", "http://b:2"]);
        r.mark_failed("http://a:1");
        r.mark_failed("http://b:2");
        assert_eq!(r.next().as_deref(), Some("http://a:1"));
        assert_eq!(r.failed_count(), 0);
    }
}
