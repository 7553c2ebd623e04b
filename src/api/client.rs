use super::error::ApiError;
use super::types::{
    CreateScriptRequest, CreateScriptResponse, CreateSummaryRequest, CreateSummaryResponse,
    ExtractTextResponse,
};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info};

/// Connection settings for the generation backend
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Client for the external extraction / summary / script backend
#[derive(Debug, Clone)]
pub struct PrepNoteClient {
    http: reqwest::Client,
    base_url: String,
}

impl PrepNoteClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        info!("Generation backend at {}", config.base_url);

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST /extract-text
    ///
    /// Uploads a document and returns its trimmed plain text. Empty text is
    /// reported as `ApiError::EmptyExtraction`.
    pub async fn extract_text(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, ApiError> {
        info!("Extracting text from {} ({} bytes)", file_name, bytes.len());

        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.to_string()));
        let response = self
            .http
            .post(self.url("/extract-text"))
            .multipart(form)
            .send()
            .await?;

        let extracted: ExtractTextResponse = Self::decode(response).await?;
        let text = extracted.text.trim();
        if text.is_empty() {
            return Err(ApiError::EmptyExtraction);
        }
        Ok(text.to_string())
    }

    /// POST /summaries
    pub async fn create_summary(
        &self,
        request: &CreateSummaryRequest,
    ) -> Result<CreateSummaryResponse, ApiError> {
        info!("Requesting summary for \"{}\"", request.title);
        let response = self.http.post(self.url("/summaries")).json(request).send().await?;
        Self::decode(response).await
    }

    /// POST /scripts
    pub async fn create_script(
        &self,
        request: &CreateScriptRequest,
    ) -> Result<CreateScriptResponse, ApiError> {
        info!(
            "Requesting {}-speaker script for \"{}\"",
            request.options.speaker_count, request.title
        );
        let response = self.http.post(self.url("/scripts")).json(request).send().await?;
        Self::decode(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_body(status.as_u16(), &body);
        error!("[API Error] {} {}", status.as_u16(), err);
        Err(err)
    }
}
