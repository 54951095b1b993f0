// src/core/fs_ops.rs
//! Async file helpers for config loading and export

use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use tracing::debug;

pub struct FsOps;

impl FsOps {
    /// `create_dir_all`, a no-op for existing directories
    pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() || path.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(path)
            .await
            .with_context(|| format!("Cannot create directory {}", path.display()))?;
        debug!("Created {}", path.display());
        Ok(())
    }

    pub async fn read_file_safe(path: &Path) -> Result<String> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Cannot read {}", path.display()))?;
        debug!("Read {} bytes from {}", content.len(), path.display());
        Ok(content)
    }

    pub async fn write_file_safe(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            Self::ensure_dir_exists(parent).await?;
        }
        fs::write(path, content.as_bytes())
            .await
            .with_context(|| format!("Cannot write {}", path.display()))?;
        debug!("Wrote {} bytes to {}", content.len(), path.display());
        Ok(())
    }

    /// Lower-cased extension, used to pick the config format
    pub fn get_extension(path: &Path) -> Option<String> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.txt");

        FsOps::write_file_safe(&path, "hello").await.unwrap();
        assert_eq!(FsOps::read_file_safe(&path).await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_ensure_dir_fails_under_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain");
        std::fs::write(&file, "x").unwrap();

        assert!(FsOps::ensure_dir_exists(&file.join("sub")).await.is_err());
    }

    #[tokio::test]
    async fn test_read_missing_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.yaml");

        let err = FsOps::read_file_safe(&missing).await.unwrap_err();
        assert!(err.to_string().contains("absent.yaml"));
        FsOps::ensure_dir_exists(dir.path()).await.unwrap();
        FsOps::ensure_dir_exists(Path::new("")).await.unwrap();
    }

    #[test]
    fn test_get_extension() {
        assert_eq!(FsOps::get_extension(Path::new("config.YAML")), Some("yaml".to_string()));
        assert_eq!(FsOps::get_extension(Path::new("config")), None);
    }
}
