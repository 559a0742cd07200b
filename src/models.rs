use serde::{Deserialize, Deserializer, Serialize};

/// Lists arrive absent, `null` or populated; the first two both mean empty.
fn list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Structured assessment of a competitor's text or scraped page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextAnalysis {
    #[serde(default, deserialize_with = "list")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "list")]
    pub weaknesses: Vec<String>,
    #[serde(default, deserialize_with = "list")]
    pub unique_offers: Vec<String>,
    #[serde(default, deserialize_with = "list")]
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technology_potential: Option<f64>,
}

/// Assessment of an uploaded marketing image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageAnalysis {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub visual_style_score: f64,
    #[serde(default)]
    pub visual_style_analysis: String,
    #[serde(default, deserialize_with = "list")]
    pub marketing_insights: Vec<String>,
    #[serde(default, deserialize_with = "list")]
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technology_potential: Option<f64>,
}

/// Headline content scraped from a competitor page, optionally analysed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedPage {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_paragraph: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<TextAnalysis>,
}

/// An analysis that can be exported as a report.
///
/// A parsed page is stored as its nested text analysis, so there is no page
/// variant. Serialised untagged: the report endpoint tells the shapes apart
/// by their fields (an image analysis carries `visual_style_score`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Text(TextAnalysis),
    Image(ImageAnalysis),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum RequestType {
    Text,
    Image,
    Parse,
    Pdf,
    Other(String),
}

impl From<String> for RequestType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "text" => RequestType::Text,
            "image" => RequestType::Image,
            "parse" => RequestType::Parse,
            "pdf" => RequestType::Pdf,
            _ => RequestType::Other(raw),
        }
    }
}

impl RequestType {
    pub fn label(&self) -> &str {
        match self {
            RequestType::Text => "Анализ текста",
            RequestType::Image => "Анализ изображения",
            RequestType::Parse => "Парсинг сайта",
            RequestType::Pdf => "Анализ PDF",
            RequestType::Other(raw) => raw,
        }
    }
}

/// A backend-side record of a past request. Read-only on this side.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoryEntry {
    /// ISO-8601, with or without an offset; naive values are local time.
    pub timestamp: String,
    pub request_type: RequestType,
    #[serde(default)]
    pub request_summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReportFormat {
    #[default]
    #[serde(rename = "html")]
    Html,
    #[serde(rename = "md")]
    Markdown,
    #[serde(rename = "pdf")]
    Pdf,
}

impl ReportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Markdown => "md",
            ReportFormat::Pdf => "pdf",
        }
    }

    /// Media type of the saved file.
    pub fn media_type(self) -> &'static str {
        match self {
            ReportFormat::Html => "text/html",
            ReportFormat::Markdown => "text/markdown",
            ReportFormat::Pdf => "application/pdf",
        }
    }

    /// Only PDF travels base64-encoded; the text formats arrive raw.
    pub fn is_binary(self) -> bool {
        matches!(self, ReportFormat::Pdf)
    }

    pub fn next(self) -> Self {
        match self {
            ReportFormat::Html => ReportFormat::Markdown,
            ReportFormat::Markdown => ReportFormat::Pdf,
            ReportFormat::Pdf => ReportFormat::Html,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "html" => Some(ReportFormat::Html),
            "md" | "markdown" => Some(ReportFormat::Markdown),
            "pdf" => Some(ReportFormat::Pdf),
            _ => None,
        }
    }
}

// Wire envelopes. Application failures come back as `success: false` plus an
// optional `error`; they are data, not transport errors.

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalyzeResponse<T> {
    #[serde(default)]
    pub success: bool,
    pub analysis: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParseResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<ParsedPage>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub items: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClearResponse {
    #[serde(default)]
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_analysis_tolerates_null_and_missing_lists() {
        let analysis: TextAnalysis = serde_json::from_value(json!({
            "strengths": null,
            "weaknesses": ["slow checkout"],
            "design_score": 7
        }))
        .unwrap();

        assert!(analysis.strengths.is_empty());
        assert!(analysis.unique_offers.is_empty());
        assert_eq!(analysis.weaknesses, vec!["slow checkout".to_string()]);
        assert_eq!(analysis.design_score, Some(7.0));
        assert_eq!(analysis.technology_potential, None);
    }

    #[test]
    fn test_unknown_request_type_keeps_raw_value() {
        let entry: HistoryEntry = serde_json::from_value(json!({
            "timestamp": "2024-03-05T14:07:00",
            "request_type": "visualize",
            "request_summary": "radar chart"
        }))
        .unwrap();

        assert_eq!(entry.request_type, RequestType::Other("visualize".into()));
        assert_eq!(entry.request_type.label(), "visualize");
        assert_eq!(RequestType::from("pdf".to_string()).label(), "Анализ PDF");
    }

    #[test]
    fn test_image_analysis_serialises_untagged_with_style_score() {
        let result = AnalysisResult::Image(ImageAnalysis {
            description: "hero banner".into(),
            visual_style_score: 8.0,
            ..Default::default()
        });

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["visual_style_score"], json!(8.0));
        assert_eq!(value["description"], json!("hero banner"));
        assert!(value.get("design_score").is_none());
    }

    #[test]
    fn test_report_format_cycles_and_parses() {
        assert_eq!(ReportFormat::Html.next(), ReportFormat::Markdown);
        assert_eq!(ReportFormat::Pdf.next(), ReportFormat::Html);
        assert_eq!(ReportFormat::parse("Markdown"), Some(ReportFormat::Markdown));
        assert_eq!(ReportFormat::parse("docx"), None);
        assert_eq!(serde_json::to_value(ReportFormat::Markdown).unwrap(), json!("md"));
    }

    #[test]
    fn test_failed_envelope_keeps_error_text() {
        let response: AnalyzeResponse<TextAnalysis> =
            serde_json::from_value(json!({"success": false, "error": "LLM недоступна"})).unwrap();

        assert!(!response.success);
        assert!(response.analysis.is_none());
        assert_eq!(response.error.as_deref(), Some("LLM недоступна"));
    }
}
