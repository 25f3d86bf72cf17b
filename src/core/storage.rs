use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::storage::local::{LocalStorage, LocalStorageConfig};
use crate::storage::s3::{S3Storage, S3StorageConfig};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageConfig {
    Local(LocalStorageConfig),
    S3(S3StorageConfig),
}

/// Where published media lives. Every stored object is addressed by a name
/// and exposed through a public URL.
#[derive(Clone)]
pub enum Storage {
    Local(LocalStorage),
    S3(S3Storage),
}

impl Storage {
    pub async fn new(cfg: &StorageConfig) -> anyhow::Result<Self> {
        match cfg {
            StorageConfig::Local(cfg) => Ok(Self::Local(LocalStorage::new(cfg)?)),
            StorageConfig::S3(cfg) => Ok(Self::S3(S3Storage::new(cfg)?)),
        }
    }

    /// Stores `file` under `name` and returns its public URL.
    pub async fn store_file(&self, name: &str, file: &Path) -> anyhow::Result<String> {
        match self {
            Storage::Local(backend) => backend
                .copy(file, name)
                .await
                .context("Failed to copy file to local storage")?,
            Storage::S3(backend) => backend
                .put_object(file, name)
                .await
                .context("Failed to upload file to S3")?,
        }
        Ok(self.url_for(name))
    }

    pub async fn delete_file(&self, name: &str) -> anyhow::Result<()> {
        match self {
            Storage::Local(backend) => backend.delete(name).await,
            Storage::S3(backend) => backend.delete(name).await,
        }
    }

    pub fn url_for(&self, name: &str) -> String {
        let base = match self {
            Storage::Local(backend) => backend.public_url(),
            Storage::S3(backend) => backend.public_url(),
        };
        format!("{}/{}", base.trim_end_matches('/'), name)
    }

    /// Inverse of [`Storage::url_for`]; `None` for URLs this backend did not issue.
    pub fn name_for_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        let base = match self {
            Storage::Local(backend) => backend.public_url(),
            Storage::S3(backend) => backend.public_url(),
        };
        url.strip_prefix(base.trim_end_matches('/'))
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| !name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn local_storage(public_url: &str) -> (Storage, std::path::PathBuf) {
        let root = std::env::temp_dir().join(format!("vidtube-storage-{}", uuid::Uuid::new_v4()));
        let storage = Storage::new(&StorageConfig::Local(LocalStorageConfig {
            path: root.to_string_lossy().into_owned(),
            public_url: public_url.to_string(),
        }))
        .await
        .unwrap();
        (storage, root)
    }

    #[tokio::test]
    async fn urls_map_back_to_names() {
        let (storage, root) = local_storage("/media/").await;
        let url = storage.url_for("abc.mp4");
        assert_eq!(url, "/media/abc.mp4");
        assert_eq!(storage.name_for_url(&url), Some("abc.mp4"));
        assert_eq!(storage.name_for_url("https://elsewhere/abc.mp4"), None);
        assert_eq!(storage.name_for_url("/media/"), None);
        tokio::fs::remove_dir_all(root).await.ok();
    }

    #[tokio::test]
    async fn store_and_delete_local_file() {
        let (storage, root) = local_storage("/media").await;
        let src = std::env::temp_dir().join(format!("vidtube-src-{}", uuid::Uuid::new_v4()));
        tokio::fs::write(&src, b"payload").await.unwrap();

        let url = storage.store_file("stored.bin", &src).await.unwrap();
        assert_eq!(url, "/media/stored.bin");
        assert_eq!(tokio::fs::read(root.join("stored.bin")).await.unwrap(), b"payload");

        storage.delete_file("stored.bin").await.unwrap();
        assert!(!root.join("stored.bin").exists());
        // Deleting twice is not an error.
        storage.delete_file("stored.bin").await.unwrap();

        tokio::fs::remove_file(src).await.ok();
        tokio::fs::remove_dir_all(root).await.ok();
    }
}
