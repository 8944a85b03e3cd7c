use crate::upload::types::{ExtractionResult, HealthResponse, SelectedFile};
use crate::upload::ExtractError;
use reqwest::multipart;

pub const EXTRACT_PATH: &str = "/api/invoices/extract";
pub const HEALTH_PATH: &str = "/health";
/// Multipart field name the service reads the document from.
pub const FILE_FIELD: &str = "file";

#[derive(Clone)]
pub struct ExtractionClient {
    client: reqwest::Client,
    base_url: String,
}

impl ExtractionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends exactly one multipart request carrying `file` and parses the reply.
    pub async fn extract(&self, file: &SelectedFile) -> Result<ExtractionResult, ExtractError> {
        let url = format!("{}{}", self.base_url, EXTRACT_PATH);

        let part = multipart::Part::bytes(file.content.clone())
            .file_name(file.name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| ExtractError::ServiceError(format!("invalid content type: {}", e)))?;
        let form = multipart::Form::new().part(FILE_FIELD, part);

        tracing::debug!(
            url = %url,
            file = %file.name,
            bytes = file.content.len(),
            content_type = %file.content_type,
            "sending extraction request"
        );

        let response = self.client.post(&url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, file = %file.name, "extraction request rejected");
            return Err(ExtractError::ServiceError(format!(
                "Upload failed with status: {}",
                status
            )));
        }

        let body = response.bytes().await?;
        let result = ExtractionResult::from_json(&body)?;

        tracing::info!(
            file = %file.name,
            fields = result.fields.len(),
            "extraction completed"
        );

        Ok(result)
    }

    pub async fn health(&self) -> Result<bool, ExtractError> {
        let url = format!("{}{}", self.base_url, HEALTH_PATH);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Ok(false);
        }

        let body = response.bytes().await?;
        let health: HealthResponse = serde_json::from_slice(&body)
            .map_err(|e| ExtractError::MalformedResponse(e.to_string()))?;
        Ok(health.ok)
    }
}
