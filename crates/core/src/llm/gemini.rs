use crate::config::Settings;
use crate::domain::report::AnalysisReport;
use crate::llm::error::AnalysisError;
use crate::llm::grounding::{self, GroundingMetadata};
use crate::llm::{json, prompt};
use crate::llm::{LlmClient, Provider};
use crate::time::tw_market;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-3-pro-preview";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Everything a [`GeminiClient`] needs, validated up front.
#[derive(Clone)]
pub struct AnalysisConfig {
    api_key: String,
    pub model: String,
    pub base_url: String,
    /// Transport timeout. `None` leaves it to the transport.
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AnalysisConfig {
    pub fn new(api_key: impl Into<String>) -> Result<Self, AnalysisError> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(AnalysisError::missing_api_key());
        }

        Ok(Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, AnalysisError> {
        let api_key = settings
            .gemini_api_key
            .as_deref()
            .ok_or_else(AnalysisError::missing_api_key)?;

        let mut config = Self::new(api_key)?;
        if let Some(model) = &settings.gemini_model {
            config.model = model.clone();
        }
        if let Some(base_url) = &settings.gemini_base_url {
            config.base_url = base_url.clone();
        }
        config.timeout = settings.gemini_timeout_secs.map(Duration::from_secs);
        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: AnalysisConfig,
}

impl GeminiClient {
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        let mut key = HeaderValue::from_str(&config.api_key).map_err(|_| {
            AnalysisError::Config("Gemini API key contains characters not allowed in a header".to_string())
        })?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, key);

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self { http, config })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, AnalysisError> {
        Self::new(AnalysisConfig::from_settings(settings)?)
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    fn build_request() -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: prompt::task_prompt(),
                }],
            }],
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: prompt::system_instruction(),
                }],
            },
            tools: vec![Tool {
                google_search: GoogleSearch {},
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: prompt::response_schema(),
            },
        }
    }

    async fn generate_content(
        &self,
        req: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, AnalysisError> {
        let res = self.http.post(self.config.endpoint()).json(req).send().await?;

        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(AnalysisError::Provider {
                status: status.as_u16(),
                message: provider_error_message(&text),
            });
        }

        Ok(serde_json::from_str::<GenerateContentResponse>(&text)?)
    }

    /// Turns a decoded reply into a report stamped with `now`'s Taipei date.
    fn report_from_response(
        res: &GenerateContentResponse,
        now: DateTime<Utc>,
    ) -> Result<AnalysisReport, AnalysisError> {
        let candidate = res.candidates.first();

        let text = candidate.map(Candidate::text).unwrap_or_default();
        if text.is_empty() {
            if let Some(reason) = candidate.and_then(|c| c.finish_reason.as_deref()) {
                tracing::warn!(finish_reason = reason, "Gemini candidate carried no text");
            }
            return Err(AnalysisError::EmptyResponse);
        }

        let payload = json::parse_payload(&text)?;
        let sources = grounding::collect_sources(candidate.and_then(|c| c.grounding_metadata.as_ref()));

        Ok(payload.into_report(tw_market::report_date_label(now), sources))
    }
}

#[async_trait::async_trait]
impl LlmClient for GeminiClient {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    async fn request_analysis(&self) -> Result<AnalysisReport, AnalysisError> {
        tracing::info!(
            provider = self.provider().as_str(),
            model = %self.config.model,
            "requesting market analysis"
        );

        let req = Self::build_request();
        let res = self.generate_content(&req).await?;
        let report = Self::report_from_response(&res, Utc::now())?;

        tracing::info!(
            model = %self.config.model,
            date = %report.date,
            stocks_len = report.stocks.len(),
            sources_len = report.sources.len(),
            "market analysis complete"
        );
        Ok(report)
    }
}

fn provider_error_message(body: &str) -> String {
    serde_json::from_str::<ProviderErrorEnvelope>(body)
        .ok()
        .and_then(|env| env.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    system_instruction: Content,
    tools: Vec<Tool>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Clone, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
    #[serde(default)]
    finish_reason: Option<String>,
}

impl Candidate {
    /// Concatenated text parts, skipping thought summaries.
    fn text(&self) -> String {
        let Some(content) = &self.content else {
            return String::new();
        };
        content
            .parts
            .iter()
            .filter(|p| !p.thought.unwrap_or(false))
            .filter_map(|p| p.text.as_deref())
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    thought: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorEnvelope {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    #[serde(default)]
    message: Option<String>,
}
