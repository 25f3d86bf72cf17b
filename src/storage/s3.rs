use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct S3StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    /// Defaults to `{endpoint}/{bucket}` (path-style addressing).
    pub public_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct S3Storage {
    client: Arc<Client>,
    bucket: String,
    public_url: String,
}

impl S3Storage {
    pub fn new(cfg: &S3StorageConfig) -> Result<Self> {
        let credentials = Credentials::new(
            &cfg.access_key,
            &cfg.secret_key,
            None,
            None,
            "S3Credentials",
        );
        let config = aws_sdk_s3::config::Builder::new()
            .region(Region::new(cfg.region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(cfg.endpoint.clone())
            .force_path_style(true)
            .behavior_version_latest()
            .build();

        let client = Client::from_conf(config);
        tracing::debug!(bucket = %cfg.bucket, "Initialized S3 storage");

        let public_url = cfg.public_url.clone().unwrap_or_else(|| {
            format!("{}/{}", cfg.endpoint.trim_end_matches('/'), cfg.bucket)
        });

        Ok(Self {
            client: Arc::new(client),
            bucket: cfg.bucket.clone(),
            public_url,
        })
    }

    pub(crate) fn public_url(&self) -> &str {
        &self.public_url
    }

    pub(crate) async fn put_object(&self, from: &Path, dest: &str) -> Result<()> {
        let body = ByteStream::from_path(from)
            .await
            .map_err(|e| anyhow!("Failed to read {}: {}", from.display(), e))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(dest)
            .body(body)
            .send()
            .await
            .map_err(|e| anyhow!("S3 put_object error: {}", DisplayErrorContext(&e)))?;
        Ok(())
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| anyhow!("S3 delete_object error: {}", DisplayErrorContext(&e)))?;
        Ok(())
    }
}
