use crate::domain::report::AnalysisReport;
use crate::llm::error::AnalysisError;

pub mod error;
pub mod gemini;
pub mod grounding;
pub mod json;
pub mod prompt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
        }
    }
}

#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    fn provider(&self) -> Provider;

    /// One independent round trip: fixed prompt in, fresh report out.
    async fn request_analysis(&self) -> Result<AnalysisReport, AnalysisError>;
}
