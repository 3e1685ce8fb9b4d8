use anyhow::Context;
use clap::Parser;
use std::io::{BufRead, IsTerminal, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use twstock_core::domain::report::AnalysisReport;
use twstock_core::llm::gemini::GeminiClient;
use twstock_core::llm::LlmClient;
use twstock_core::present::{card, email::EmailDraft};
use twstock_core::session::{AnalysisSession, AnalysisStatus};

mod clipboard;
mod mail;

#[derive(Debug, Parser)]
#[command(name = "twstock", about = "AI-picked Taiwan stock shortlist, grounded with web search")]
struct Args {
    /// Print the report as JSON instead of cards.
    #[arg(long)]
    json: bool,

    /// Print the plain-text email draft after the report.
    #[arg(long)]
    email: bool,

    /// Copy the email draft to the clipboard.
    #[arg(long)]
    copy: bool,

    /// Open the default mail client with the draft pre-filled.
    #[arg(long)]
    mailto: bool,

    /// Exit on failure instead of asking whether to retry.
    #[arg(long)]
    no_retry_prompt: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    let settings = twstock_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let client = match GeminiClient::from_settings(&settings) {
        Ok(client) => client,
        Err(err) => {
            let err = anyhow::Error::new(err);
            sentry_anyhow::capture_anyhow(&err);
            eprintln!("發生錯誤\n{err}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut session = AnalysisSession::new();
    if session.bootstrap() {
        announce_scan();
        let result = client.request_analysis().await;
        session.finish(result);
    }

    loop {
        match session.status().clone() {
            AnalysisStatus::Complete(report) => {
                present(&report, &args)?;
                return Ok(ExitCode::SUCCESS);
            }
            AnalysisStatus::Error(message) => {
                eprintln!("發生錯誤\n{message}");
                if args.no_retry_prompt || !std::io::stdin().is_terminal() || !ask_retry()? {
                    return Ok(ExitCode::FAILURE);
                }
                announce_scan();
                session.run(&client).await;
            }
            AnalysisStatus::Idle | AnalysisStatus::Analyzing => {
                anyhow::bail!("analysis ended in unexpected state: {}", session.status().label());
            }
        }
    }
}

fn announce_scan() {
    eprintln!("正在掃描台股市場資訊 (Search Grounding)... 這可能需要 15-30 秒");
}

fn ask_retry() -> anyhow::Result<bool> {
    eprint!("重試? [y/N] ");
    std::io::stderr().flush().ok();

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read retry answer")?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

fn present(report: &AnalysisReport, args: &Args) -> anyhow::Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", card::render_report(report));
    }

    let draft = EmailDraft::from_report(report);
    if args.email {
        println!();
        print!("{}", draft.body);
    }

    if args.copy {
        clipboard::copy_text(&draft.body)?;
        eprintln!("已複製！");
    }

    if args.mailto {
        mail::open_mail_client(&draft.mailto_url())?;
    }

    tracing::info!(
        date = %report.date,
        stocks_len = report.stocks.len(),
        sources_len = report.sources.len(),
        "report presented"
    );
    Ok(())
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
