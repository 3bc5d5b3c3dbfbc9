mod api;
mod config;
mod models;
mod services;
mod sources;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::AppState;
use config::{Config, ServerConfig};
use services::{RiskEngine, ScanOutcome, TokenScanner};
use sources::DexScreenerClient;

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    config_path: PathBuf,
    serve: bool,
    json: bool,
    batch_file: Option<PathBuf>,
    address: Option<String>,
}

fn parse_args(args: &[String]) -> anyhow::Result<CliArgs> {
    let mut cli = CliArgs {
        config_path: PathBuf::from("config.toml"),
        ..Default::default()
    };

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--serve" | "-s" => cli.serve = true,
            "--json" => cli.json = true,
            "--batch" | "-b" => cli.batch_file = Some(flag_value(arg, iter.next())?),
            "--config" | "-c" => cli.config_path = flag_value(arg, iter.next())?,
            other if !other.starts_with('-') && cli.address.is_none() => {
                cli.address = Some(other.to_string());
            }
            other => eprintln!("ignoring argument {}", other),
        }
    }

    Ok(cli)
}

fn flag_value(flag: &str, value: Option<&String>) -> anyhow::Result<PathBuf> {
    match value {
        Some(path) if !path.starts_with('-') => Ok(PathBuf::from(path)),
        _ => anyhow::bail!("{} expects a file path", flag),
    }
}

/// One address per line; blank lines and `#` comments are skipped.
fn parse_address_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

fn prompt_address() -> io::Result<String> {
    print!("Enter the memecoin contract address: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn print_outcomes(outcomes: &[ScanOutcome], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcomes)?);
        return Ok(());
    }

    let multiple = outcomes.len() > 1;
    for outcome in outcomes {
        if multiple {
            println!("── {}", outcome.address());
        }
        println!("{}", outcome.render());
        if multiple {
            println!();
        }
    }
    Ok(())
}

async fn run_batch(scanner: &TokenScanner, path: &Path, json: bool) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let addresses = parse_address_list(&content);
    tracing::info!("✓ {} addresses loaded from {}", addresses.len(), path.display());

    let progress = ProgressBar::new(addresses.len() as u64);
    progress.set_style(ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} ({elapsed})")?);

    let outcomes = scanner.scan_many(&addresses, &progress).await;
    progress.finish_and_clear();

    print_outcomes(&outcomes, json)
}

async fn serve(scanner: Arc<TokenScanner>, server: &ServerConfig) -> anyhow::Result<()> {
    let app = api::create_rest_router(Arc::new(AppState { scanner }));

    let addr = format!("{}:{}", server.host, server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("✓ Server ready on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cli = parse_args(&args)?;

    // stdout carries reports only
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,honeypot_scanner=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Config::load(&cli.config_path)?;
    tracing::debug!("configuration: {:?}", config);

    let source = Arc::new(DexScreenerClient::new(&config.source)?);
    let scanner = Arc::new(TokenScanner::new(
        source,
        RiskEngine::default(),
        config.scanner.concurrency,
    ));

    if cli.serve {
        return serve(scanner, &config.server).await;
    }

    if let Some(path) = &cli.batch_file {
        return run_batch(&scanner, path, cli.json).await;
    }

    let address = match cli.address {
        Some(address) => address,
        None => prompt_address()?,
    };

    let outcome = scanner.scan(&address).await;
    print_outcomes(&[outcome], cli.json)
}
