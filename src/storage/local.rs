use std::path::{Path, PathBuf};

use anyhow::Context;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct LocalStorageConfig {
    pub path: String,
    /// Base URL the directory is served under.
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

fn default_public_url() -> String {
    "/media".to_string()
}

#[derive(Debug, Clone)]
pub struct LocalStorage {
    pub path: PathBuf,
    public_url: String,
}

impl LocalStorage {
    pub fn new(cfg: &LocalStorageConfig) -> Result<Self> {
        let path = std::path::PathBuf::from(&cfg.path);
        tracing::debug!(path = ?path, "Initialized local storage");
        std::fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create storage directory: {}", path.display()))?;
        Ok(Self {
            path,
            public_url: cfg.public_url.clone(),
        })
    }

    pub(crate) fn public_url(&self) -> &str {
        &self.public_url
    }

    pub(crate) async fn copy(&self, from: &Path, dest: &str) -> Result<()> {
        let dest_path = self.path.join(dest);
        tracing::trace!(
            "Copying file from {} to {}",
            from.display(),
            dest_path.display()
        );
        tokio::fs::copy(from, &dest_path).await.with_context(|| {
            format!(
                "Failed to copy file to local storage: {}",
                dest_path.display()
            )
        })?;
        tracing::trace!("File copied successfully to {}", dest_path.display());
        Ok(())
    }

    pub(crate) async fn delete(&self, name: &str) -> Result<()> {
        let file_path = self.path.join(name);
        tracing::trace!("Deleting file from local storage: {}", file_path.display());
        if !file_path.exists() {
            return Ok(());
        }
        tokio::fs::remove_file(&file_path)
            .await
            .with_context(|| format!("Failed to delete file: {}", file_path.display()))?;
        Ok(())
    }
}
