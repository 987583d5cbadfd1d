//! Console chat for the booking assistant
//!
//! Runs the dialog engine over in-memory stores seeded from a JSON catalog.
//! Logs go to stderr; `RUST_LOG` controls the level.

mod commands;
mod seed;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use booking_agent_agent::{DialogueOrchestrator, SessionContext, TurnResponse};
use booking_agent_config::AssistantConfig;
use booking_agent_persistence::MemoryLayer;

use crate::commands::{parse_line, Command, HELP};
use crate::seed::CatalogSeed;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Output {
    /// Message and options as text
    Text,
    /// Full response payload
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "booking-agent")]
#[command(about = "Chat with the booking assistant", long_about = None)]
struct Cli {
    /// Assistant configuration (YAML)
    #[arg(long, env = "BOOKING_AGENT_CONFIG")]
    config: Option<PathBuf>,

    /// Catalog seed (JSON)
    #[arg(long, default_value = "config/catalog.json")]
    catalog: PathBuf,

    /// Conversation key
    #[arg(long, default_value = "console")]
    session: String,

    /// Identified customer, needed to finalize quotes
    #[arg(long)]
    person: Option<i64>,

    #[arg(long, value_enum, default_value_t = Output::Text)]
    output: Output,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "booking_agent=info,warn".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

fn render(response: &TurnResponse, output: Output) -> Result<String> {
    if let Output::Json = output {
        return serde_json::to_string_pretty(response).context("serializing response");
    }

    let mut lines = vec![response.message.clone()];
    for group in response.option_groups.iter().flatten() {
        lines.push(format!("[{}]", group.service));
        lines.extend(
            group
                .items
                .iter()
                .map(|item| format!("  {:>4}  {}  ${:.2}", item.id, item.name, item.price)),
        );
    }
    for action in response.actions.iter().flatten() {
        lines.push(format!("  → {}", action.label));
    }
    lines.push(format!("({})", response.state.as_str()));
    Ok(lines.join("\n"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config = AssistantConfig::load(cli.config.as_ref()).context("loading assistant configuration")?;
    let layer = MemoryLayer::with_catalog(CatalogSeed::load(&cli.catalog)?.into_catalog());
    let orchestrator = DialogueOrchestrator::new(
        &config,
        layer.catalog.clone(),
        layer.sessions.clone(),
        layer.quotes.clone(),
    )?;

    let mut ctx = SessionContext::new(cli.session.clone());
    ctx.person_id = cli.person;
    tracing::info!(session = %ctx.session_key, person = ?ctx.person_id, "Console session started");

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    stdout.write_all(format!("{}\n> ", HELP).as_bytes()).await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let reply = match parse_line(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => HELP.to_string(),
            Ok(Command::Turn(request)) => {
                let response = orchestrator.handle_turn(&ctx, request).await;
                render(&response, cli.output)?
            }
            Err(e) => format!("error: {:#}", e),
        };
        stdout.write_all(format!("{}\n> ", reply).as_bytes()).await?;
        stdout.flush().await?;
    }

    let stored = layer.quotes.records();
    tracing::info!(quote_rows = stored.len(), "Console session ended");
    Ok(())
}
