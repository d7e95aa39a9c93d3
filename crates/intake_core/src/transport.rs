//! HTTP seam to the external parsing service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use shared::{
    error::ServiceErrorBody,
    protocol::{HealthResponse, UploadResponse, HEALTH_PATH, UPLOAD_FIELD, UPLOAD_PATH},
};
use tracing::{debug, info, warn};
use url::Url;

use crate::{config::IntakeSettings, error::IntakeError, file::SelectedFile};

/// Everything needed to issue one upload, detached from the controller so it
/// can cross to a worker thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub file: SelectedFile,
}

#[async_trait]
pub trait ParseTransport: Send + Sync {
    async fn upload(&self, request: UploadRequest) -> Result<UploadResponse, IntakeError>;
    async fn health(&self) -> Result<HealthResponse, IntakeError>;
}

pub struct HttpParseTransport {
    http: Client,
    endpoint: String,
}

impl HttpParseTransport {
    pub fn new(settings: &IntakeSettings) -> Result<Self, IntakeError> {
        let endpoint = normalize_endpoint(&settings.endpoint)?;
        let mut builder = Client::builder();
        if let Some(secs) = settings.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|err| IntakeError::Transport(format!("failed to build HTTP client: {err}")))?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ParseTransport for HttpParseTransport {
    async fn upload(&self, request: UploadRequest) -> Result<UploadResponse, IntakeError> {
        let file = request.file;
        let bytes = file.read_bytes().await?;
        let part = Part::bytes(bytes)
            .file_name(file.name().to_string())
            .mime_str(file.upload_mime())?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let url = format!("{}/{UPLOAD_PATH}", self.endpoint);
        debug!(%url, file = file.name(), size_bytes = file.size_bytes(), "uploading document");
        let response = self.http.post(&url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ServiceErrorBody>(&body)
                .ok()
                .and_then(|body| body.detail_message());
            warn!(status = status.as_u16(), detail = ?detail, "parsing service rejected upload");
            return Err(IntakeError::server(status.as_u16(), detail));
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|err| IntakeError::Transport(format!("invalid upload response payload: {err}")))?;
        info!(
            file = file.name(),
            skills = parsed.extracted_data.skills.len(),
            education = parsed.extracted_data.education.len(),
            experience = parsed.extracted_data.experience.len(),
            "parsing service returned extracted record"
        );
        Ok(parsed)
    }

    async fn health(&self) -> Result<HealthResponse, IntakeError> {
        let url = format!("{}/{HEALTH_PATH}", self.endpoint);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IntakeError::Server {
                status: status.as_u16(),
                message: format!("health check returned HTTP {status}"),
            });
        }
        Ok(response.json().await?)
    }
}

/// Trims whitespace and trailing slashes and requires an absolute http(s) URL.
pub fn normalize_endpoint(raw: &str) -> Result<String, IntakeError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = |reason: String| IntakeError::InvalidEndpoint {
        endpoint: raw.to_string(),
        reason,
    };

    let url = Url::parse(trimmed).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
