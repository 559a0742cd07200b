use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::{TransportError, TransportResult};
use crate::message::Message;
use crate::models::{
    AnalysisResult, AnalyzeResponse, ClearResponse, HistoryResponse, ImageAnalysis, ParseResponse,
    ReportFormat, ReportResponse, TextAnalysis,
};
use crate::upload::PendingUpload;

/// Thin typed wrapper over the analysis backend. One HTTP call per method,
/// no retries, no client-side timeout.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> TransportResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("competitor-monitor/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Non-2xx and unparseable bodies are both transport failures.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> TransportResult<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status));
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn analyze_text(&self, text: &str) -> TransportResult<AnalyzeResponse<TextAnalysis>> {
        let response = self
            .http
            .post(self.url("/analyze_text"))
            .json(&json!({ "text": text }))
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn analyze_image(
        &self,
        upload: &PendingUpload,
    ) -> TransportResult<AnalyzeResponse<ImageAnalysis>> {
        let part = Part::bytes(upload.bytes.to_vec())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.media_type)?;
        let form = Form::new().part("file", part);
        let response = self
            .http
            .post(self.url("/analyze_image"))
            .multipart(form)
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn parse_demo(&self, url: &str) -> TransportResult<ParseResponse> {
        let response = self
            .http
            .post(self.url("/parse_demo"))
            .json(&json!({ "url": url }))
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn get_history(&self) -> TransportResult<HistoryResponse> {
        let response = self.http.get(self.url("/history")).send().await?;
        Self::decode(response).await
    }

    pub async fn clear_history(&self) -> TransportResult<ClearResponse> {
        let response = self.http.delete(self.url("/history")).send().await?;
        Self::decode(response).await
    }

    pub async fn generate_report(
        &self,
        analysis: &AnalysisResult,
        format: ReportFormat,
    ) -> TransportResult<ReportResponse> {
        let response = self
            .http
            .post(self.url("/generate_report"))
            .json(&json!({ "analysis_data": analysis, "format": format }))
            .send()
            .await?;
        Self::decode(response).await
    }

    /// `true` when `/health` answers with a 2xx.
    pub async fn check_health(&self) -> bool {
        match self.http.get(self.url("/health")).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("Health check failed: {}", e);
                false
            }
        }
    }
}

/// A backend call waiting to be run off the UI loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    AnalyzeText(String),
    AnalyzeImage(PendingUpload),
    ParseDemo(String),
    GetHistory { generation: u64 },
    ClearHistory,
    GenerateReport {
        analysis: AnalysisResult,
        format: ReportFormat,
    },
    CheckHealth,
}

impl ApiRequest {
    pub fn name(&self) -> &'static str {
        match self {
            ApiRequest::AnalyzeText(_) => "analyze_text",
            ApiRequest::AnalyzeImage(_) => "analyze_image",
            ApiRequest::ParseDemo(_) => "parse_demo",
            ApiRequest::GetHistory { .. } => "get_history",
            ApiRequest::ClearHistory => "clear_history",
            ApiRequest::GenerateReport { .. } => "generate_report",
            ApiRequest::CheckHealth => "health",
        }
    }

    /// Performs the call and wraps its outcome as the matching completion.
    pub async fn run(self, client: &ApiClient) -> Message {
        debug!("Dispatching {}", self.name());
        match self {
            ApiRequest::AnalyzeText(text) => Message::TextAnalyzed(client.analyze_text(&text).await),
            ApiRequest::AnalyzeImage(upload) => {
                Message::ImageAnalyzed(client.analyze_image(&upload).await)
            }
            ApiRequest::ParseDemo(url) => Message::PageParsed(client.parse_demo(&url).await),
            ApiRequest::GetHistory { generation } => Message::HistoryLoaded {
                generation,
                result: client.get_history().await,
            },
            ApiRequest::ClearHistory => Message::HistoryCleared(client.clear_history().await),
            ApiRequest::GenerateReport { analysis, format } => Message::ReportGenerated {
                format,
                result: client.generate_report(&analysis, format).await,
            },
            ApiRequest::CheckHealth => Message::HealthChecked(client.check_health().await),
        }
    }
}
