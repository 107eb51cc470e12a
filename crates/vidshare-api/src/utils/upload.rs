//! Multipart upload spooling
//!
//! File parts are streamed to temporary files that keep the original
//! extension (the media store infers the resource kind from it). A file
//! that is never handed to the media store is deleted when its
//! [`UploadedFile`] is dropped.

use axum::extract::multipart::{Field, MultipartRejection};
use axum::extract::Multipart;
use std::collections::HashMap;
use std::path::Path;
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;
use vidshare_core::AppError;

use crate::state::UploadConfig;

const MAX_EXTENSION_LEN: usize = 10;

/// A file part spooled to disk.
#[derive(Debug)]
pub struct UploadedFile {
    pub path: TempPath,
    pub file_name: Option<String>,
    pub size: usize,
}

impl UploadedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Text fields and spooled files of one multipart request.
#[derive(Debug, Default)]
pub struct UploadForm {
    texts: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl UploadForm {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.texts.get(name).map(String::as_str)
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}

/// Lowercased alphanumeric extension of a client-supplied file name.
fn sanitized_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    (!ext.is_empty()
        && ext.len() <= MAX_EXTENSION_LEN
        && ext.chars().all(|c| c.is_ascii_alphanumeric()))
    .then_some(ext)
}

fn multipart_error(e: impl std::fmt::Display) -> AppError {
    AppError::Validation(format!("Failed to read multipart: {}", e))
}

async fn spool_file(
    mut field: Field<'_>,
    file_name: Option<String>,
    config: &UploadConfig,
) -> Result<UploadedFile, AppError> {
    let suffix = file_name
        .as_deref()
        .and_then(sanitized_extension)
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default();

    let temp = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(&suffix)
        .tempfile_in(&config.temp_dir)?;
    let (file, path) = temp.into_parts();
    let mut file = tokio::fs::File::from_std(file);

    let mut size = 0usize;
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        size += chunk.len();
        if size > config.max_file_size {
            return Err(AppError::PayloadTooLarge(format!(
                "File size exceeds maximum allowed size of {} MB",
                config.max_file_size / 1024 / 1024
            )));
        }
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    Ok(UploadedFile {
        path,
        file_name,
        size,
    })
}

/// Read a whole multipart request, spooling every non-empty file part.
pub async fn read_upload_form(
    multipart: Result<Multipart, MultipartRejection>,
    config: &UploadConfig,
) -> Result<UploadForm, AppError> {
    let mut multipart = multipart.map_err(|e| multipart_error(e.body_text()))?;
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let file = spool_file(field, Some(file_name), config).await?;
                if file.size > 0 {
                    form.files.insert(name, file);
                }
            }
            None => {
                let value = field.text().await.map_err(multipart_error)?;
                form.texts.insert(name, value);
            }
        }
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitized_extension() {
        assert_eq!(sanitized_extension("clip.MP4").as_deref(), Some("mp4"));
        assert_eq!(sanitized_extension("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(sanitized_extension("noext"), None);
        assert_eq!(sanitized_extension("evil.p/ng"), None);
        assert_eq!(sanitized_extension("trailing."), None);
    }
}
