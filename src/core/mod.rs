// src/core/mod.rs
//! Core services: configuration, HTTP with retries, proxies, file output

pub mod config_manager;
pub mod exporter;
pub mod fs_ops;
pub mod proxy_rotator;
pub mod requester;
pub mod retry;

pub use config_manager::ConfigManager;
pub use exporter::{ExportedFiles, Exporter};
pub use fs_ops::FsOps;
pub use proxy_rotator::ProxyRotator;
pub use requester::Requester;
pub use retry::{AttemptOutcome, FetchError, RetryPolicy};
