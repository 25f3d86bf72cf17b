use std::path::PathBuf;
use std::sync::Arc;

use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWriteExt, BufWriter};
use tracing::{debug, error, trace};
use uuid::Uuid;

use crate::core::storage::Storage;

/// A multipart file spooled to the temp dir, not yet published.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Clone)]
pub struct MediaService {
    tmp_dir: PathBuf,
    storage: Arc<Storage>,
}

impl MediaService {
    pub fn new(tmp_dir: PathBuf, storage: Arc<Storage>) -> Self {
        Self { tmp_dir, storage }
    }

    pub async fn save_to_tmp<R>(&self, reader: &mut R, ext: &str) -> anyhow::Result<Upload>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let name = format!("{}.{ext}", Uuid::new_v4());
        let path = self.tmp_dir.join(&name);
        let mut file = BufWriter::new(File::create(&path).await?);
        tokio::io::copy(reader, &mut file).await?;
        file.flush().await?;
        trace!("Spooled upload to {}", path.display());
        Ok(Upload { name, path })
    }

    /// Moves `upload` into storage and returns its public URL. The temp file
    /// is removed either way.
    pub async fn publish(&self, upload: Upload) -> anyhow::Result<String> {
        let res = self.storage.store_file(&upload.name, &upload.path).await;
        self.discard(upload).await;
        let url = res?;
        debug!("Published {url}");
        Ok(url)
    }

    pub async fn discard(&self, upload: Upload) {
        if let Err(e) = tokio::fs::remove_file(&upload.path).await {
            error!("Failed to remove temp file {}: {}", upload.path.display(), e);
        }
    }

    pub async fn discard_all(&self, uploads: impl IntoIterator<Item = Upload>) {
        for upload in uploads {
            self.discard(upload).await;
        }
    }

    /// Removes a previously published file. Failures are only logged.
    pub async fn remove(&self, url: &str) {
        let Some(name) = self.storage.name_for_url(url) else {
            return;
        };
        if let Err(e) = self.storage.delete_file(name).await {
            error!("Failed to delete {} from storage: {}", url, e);
        }
    }
}
