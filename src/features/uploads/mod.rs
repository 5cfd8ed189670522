//! File uploads for advisor logos and testimonial PDFs. Each upload is one
//! multipart request with a single `file` field; the backend answers with the
//! public URL of the stored file.

use crate::app_lib::{ApiClient, AppError, bearer};
use reqwest::multipart::{Form, Part};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, instrument};

#[derive(Clone, Debug, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

/// A file read into memory, ready to be sent.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for UploadFile {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("UploadFile")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl UploadFile {
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_for(&file_name).to_string();
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }

    /// Reads `path` from disk.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the file cannot be read.
    pub async fn read(path: &Path) -> Result<Self, AppError> {
        let bytes = tokio::fs::read(path).await.map_err(|err| {
            AppError::Config(format!("Cannot read '{}': {err}", path.display()))
        })?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |name| name.to_string_lossy().into_owned());
        Ok(Self::new(file_name, bytes))
    }

    fn into_form(self) -> Result<Form, AppError> {
        let part = Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime_type)
            .map_err(|err| AppError::Serialization(format!("Invalid file type: {err}")))?;
        Ok(Form::new().part("file", part))
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[instrument(skip(api, token, file), fields(file = %file.file_name))]
async fn upload(
    api: &ApiClient,
    endpoint: &str,
    token: &SecretString,
    file: UploadFile,
) -> Result<String, AppError> {
    let form = file.into_form()?;
    let response: UploadResponse = api.post_multipart(endpoint, form, &[bearer(token)]).await?;
    debug!("upload stored");
    Ok(response.url)
}

/// Uploads a company logo and returns its URL.
pub async fn upload_logo(
    api: &ApiClient,
    token: &SecretString,
    file: UploadFile,
) -> Result<String, AppError> {
    upload(api, "/api/upload/logo", token, file).await
}

/// Uploads a testimonial PDF and returns its URL.
pub async fn upload_testimonial(
    api: &ApiClient,
    token: &SecretString,
    file: UploadFile,
) -> Result<String, AppError> {
    upload(api, "/api/upload/testimonial", token, file).await
}
