use crate::domain::report::AnalysisReport;
use crate::llm::error::AnalysisError;
use crate::llm::LlmClient;
use serde::Serialize;

/// What the front end is showing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum AnalysisStatus {
    Idle,
    Analyzing,
    Complete(AnalysisReport),
    Error(String),
}

impl AnalysisStatus {
    pub fn is_analyzing(&self) -> bool {
        matches!(self, AnalysisStatus::Analyzing)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnalysisStatus::Idle => "idle",
            AnalysisStatus::Analyzing => "analyzing",
            AnalysisStatus::Complete(_) => "complete",
            AnalysisStatus::Error(_) => "error",
        }
    }
}

/// In-memory holder of the current status.
///
/// The report lives only here; the next finished run replaces it and
/// `clear` drops it.
#[derive(Debug)]
pub struct AnalysisSession {
    status: AnalysisStatus,
    bootstrapped: bool,
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self {
            status: AnalysisStatus::Idle,
            bootstrapped: false,
        }
    }

    pub fn status(&self) -> &AnalysisStatus {
        &self.status
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        match &self.status {
            AnalysisStatus::Complete(report) => Some(report),
            _ => None,
        }
    }

    /// Entry action for a freshly started front end. Returns `true` only on
    /// the first call, which also moves the session to `Analyzing`; the
    /// caller then runs the request and hands the outcome to `finish`.
    pub fn bootstrap(&mut self) -> bool {
        if self.bootstrapped {
            return false;
        }
        self.bootstrapped = true;
        self.begin()
    }

    /// Enters `Analyzing`. Returns `false` if a run was already in flight;
    /// the state is `Analyzing` either way.
    pub fn begin(&mut self) -> bool {
        if self.status.is_analyzing() {
            return false;
        }
        self.bootstrapped = true;
        self.status = AnalysisStatus::Analyzing;
        true
    }

    /// Records the outcome of a run. The last call wins.
    pub fn finish(&mut self, result: Result<AnalysisReport, AnalysisError>) {
        self.status = match result {
            Ok(report) => AnalysisStatus::Complete(report),
            Err(err) => {
                tracing::error!(kind = err.kind(), error = %err, "analysis failed");
                AnalysisStatus::Error(err.to_string())
            }
        };
    }

    /// Drops a completed report. Returns `false` (and does nothing) from
    /// any other state.
    pub fn clear(&mut self) -> bool {
        if !matches!(self.status, AnalysisStatus::Complete(_)) {
            return false;
        }
        self.status = AnalysisStatus::Idle;
        true
    }

    /// Full run for single-owner callers: begin, request, finish.
    pub async fn run(&mut self, client: &dyn LlmClient) -> &AnalysisStatus {
        self.begin();
        let result = client.request_analysis().await;
        self.finish(result);
        &self.status
    }
}
