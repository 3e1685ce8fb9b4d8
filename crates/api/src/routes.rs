use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use twstock_core::domain::report::AnalysisReport;
use twstock_core::llm::error::AnalysisError;
use twstock_core::llm::LlmClient;
use twstock_core::present::{card, email::EmailDraft};
use twstock_core::session::{AnalysisSession, AnalysisStatus};

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RwLock<AnalysisSession>>,
    /// `None` when the credential is missing; the API still serves status.
    pub client: Option<Arc<dyn LlmClient>>,
}

impl AppState {
    pub fn new(client: Option<Arc<dyn LlmClient>>) -> Self {
        Self {
            session: Arc::new(RwLock::new(AnalysisSession::new())),
            client,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/status", get(get_status))
        .route("/analysis", post(post_analysis))
        .route("/report", get(get_report).delete(delete_report))
        .route("/report/cards", get(get_cards))
        .route("/report/email", get(get_email))
        .route("/report/mailto", get(get_mailto))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// First-boot entry action: auto-runs the initial analysis once, in the
/// background. Without a client the session goes straight to `Error`.
pub async fn bootstrap(state: &AppState, config_error: Option<AnalysisError>) {
    let mut session = state.session.write().await;
    if !session.bootstrap() {
        return;
    }

    match (&state.client, config_error) {
        (Some(_), _) => {
            drop(session);
            let state = state.clone();
            tokio::spawn(async move {
                complete_run(&state).await;
            });
        }
        (None, err) => session.finish(Err(err.unwrap_or_else(AnalysisError::missing_api_key))),
    }
}

/// Requests the analysis and records the outcome. The caller must already
/// have moved the session to `Analyzing`. The lock is not held across the
/// request.
async fn complete_run(state: &AppState) -> AnalysisStatus {
    let result = match &state.client {
        Some(client) => client.request_analysis().await,
        None => Err(AnalysisError::missing_api_key()),
    };

    let mut session = state.session.write().await;
    session.finish(result);
    tracing::info!(status = session.status().label(), "analysis run finished");
    session.status().clone()
}

async fn healthz() -> &'static str {
    "ok"
}

async fn get_status(State(state): State<AppState>) -> Json<AnalysisStatus> {
    Json(state.session.read().await.status().clone())
}

/// Runs a fresh analysis; also the manual retry after an error.
async fn post_analysis(
    State(state): State<AppState>,
) -> Result<Json<AnalysisStatus>, (StatusCode, String)> {
    if state.client.is_none() {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            AnalysisError::missing_api_key().to_string(),
        ));
    }

    {
        let mut session = state.session.write().await;
        if !session.begin() {
            return Err((StatusCode::CONFLICT, "analysis already in progress".to_string()));
        }
    }

    // The run outlives the request; a dropped connection still reaches `finish`.
    let run = tokio::spawn(async move { complete_run(&state).await });
    match run.await {
        Ok(status) => Ok(Json(status)),
        Err(e) => {
            tracing::error!(error = %e, "analysis task failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, "analysis task failed".to_string()))
        }
    }
}

async fn delete_report(State(state): State<AppState>) -> StatusCode {
    if state.session.write().await.clear() {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::CONFLICT
    }
}

async fn current_report(state: &AppState) -> Result<AnalysisReport, StatusCode> {
    state
        .session
        .read()
        .await
        .report()
        .cloned()
        .ok_or(StatusCode::NOT_FOUND)
}

async fn get_report(State(state): State<AppState>) -> Result<Json<AnalysisReport>, StatusCode> {
    Ok(Json(current_report(&state).await?))
}

async fn get_cards(State(state): State<AppState>) -> Result<impl IntoResponse, StatusCode> {
    let report = current_report(&state).await?;
    Ok(plain_text(card::render_report(&report)))
}

async fn get_email(State(state): State<AppState>) -> Result<impl IntoResponse, StatusCode> {
    let report = current_report(&state).await?;
    Ok(plain_text(EmailDraft::from_report(&report).body))
}

#[derive(Debug, Serialize)]
struct MailtoLink {
    subject: String,
    url: String,
}

async fn get_mailto(State(state): State<AppState>) -> Result<Json<MailtoLink>, StatusCode> {
    let report = current_report(&state).await?;
    let draft = EmailDraft::from_report(&report);
    let url = draft.mailto_url();
    Ok(Json(MailtoLink {
        subject: draft.subject,
        url,
    }))
}

fn plain_text(body: String) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body)
}
