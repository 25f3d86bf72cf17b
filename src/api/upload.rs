use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::pin::pin;

use axum::extract::Multipart;
use futures_util::TryStreamExt;
use tokio_util::io::StreamReader;

use crate::service::media::Upload;
use crate::service::{Error, MediaService};

/// A parsed multipart body: text fields in memory, file fields spooled to the
/// temp dir. Callers take what they need and [`UploadForm::discard`] the rest.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    files: HashMap<String, Upload>,
}

impl UploadForm {
    pub async fn read(media: &MediaService, mut multipart: Multipart) -> Result<Self, Error> {
        let mut form = UploadForm::default();
        loop {
            let field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(e) => {
                    form.discard(media).await;
                    return Err(Error::BadRequest(e.body_text()));
                }
            };
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if let Some(ext) = field.file_name().map(file_extension) {
                let body_with_io_error = field.map_err(io::Error::other);
                let mut reader = pin!(StreamReader::new(body_with_io_error));
                match media.save_to_tmp(&mut reader, &ext).await {
                    Ok(upload) => {
                        if let Some(previous) = form.files.insert(name, upload) {
                            media.discard(previous).await;
                        }
                    }
                    Err(e) => {
                        tracing::error!("Failed to save uploaded file: {}", e);
                        form.discard(media).await;
                        return Err(Error::BadRequest(format!(
                            "Failed to read uploaded file {name}"
                        )));
                    }
                }
            } else {
                match field.text().await {
                    Ok(text) => {
                        form.fields.insert(name, text);
                    }
                    Err(e) => {
                        form.discard(media).await;
                        return Err(Error::BadRequest(e.body_text()));
                    }
                }
            }
        }
        Ok(form)
    }

    /// The text field `name`, empty when absent.
    pub fn text(&mut self, name: &str) -> String {
        self.fields.remove(name).unwrap_or_default()
    }

    pub fn file(&mut self, name: &str) -> Option<Upload> {
        self.files.remove(name)
    }

    pub async fn discard(self, media: &MediaService) {
        media.discard_all(self.files.into_values()).await;
    }
}

/// Lowercased extension of an uploaded file name, `bin` when it has none or
/// it is not plain alphanumeric.
fn file_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 8)
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "bin".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_are_sanitized() {
        assert_eq!(file_extension("clip.MP4"), "mp4");
        assert_eq!(file_extension("avatar.png"), "png");
        assert_eq!(file_extension("noext"), "bin");
        assert_eq!(file_extension("../../etc/passwd"), "bin");
        assert_eq!(file_extension("evil.p/ng"), "bin");
        assert_eq!(file_extension("weird.tar.gz$"), "bin");
    }
}
