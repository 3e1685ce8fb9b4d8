use thiserror::Error;

/// Every way a single analysis invocation can fail.
///
/// None of these are retried; the front end shows the message and offers
/// a manual retry.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Credential missing or client unusable; raised before any request.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("No response generated from Gemini.")]
    EmptyResponse,

    #[error("failed to parse model output as analysis JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Gemini request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx reply (rate limit, invalid key, model error, ...).
    #[error("Gemini returned HTTP {status}: {message}")]
    Provider { status: u16, message: String },
}

impl AnalysisError {
    pub fn missing_api_key() -> Self {
        AnalysisError::Config(
            "Gemini API key is missing. Set GEMINI_API_KEY (or API_KEY) in the environment or .env file."
                .to_string(),
        )
    }

    /// Short machine-readable kind, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Config(_) => "config",
            AnalysisError::EmptyResponse => "empty_response",
            AnalysisError::Parse(_) => "parse",
            AnalysisError::Transport(_) => "transport",
            AnalysisError::Provider { .. } => "provider",
        }
    }
}
