use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use twstock_core::llm::gemini::GeminiClient;
use twstock_core::llm::LlmClient;

mod routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = twstock_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let (client, config_error) = match GeminiClient::from_settings(&settings) {
        Ok(client) => {
            tracing::info!(model = %client.config().model, "gemini client ready");
            (Some(Arc::new(client) as Arc<dyn LlmClient>), None)
        }
        Err(e) => {
            let err = anyhow::anyhow!(e.to_string());
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %e, "gemini client unavailable; starting API in degraded mode");
            (None, Some(e))
        }
    };

    let state = routes::AppState::new(client);
    routes::bootstrap(&state, config_error).await;

    let app = routes::router(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &twstock_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
