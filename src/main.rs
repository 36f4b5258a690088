// src/main.rs
//! Whitelist dApp entry point
//! Connects the configured wallet, renders the page and optionally joins the whitelist.
use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use whitelist_dapp::blockchain::ethereum::LocalWalletExtension;
use whitelist_dapp::cli::{Cli, Commands};
use whitelist_dapp::core::config::DappConfig;
use whitelist_dapp::session::{ConsoleAlert, SessionSnapshot, WalletSession};
use whitelist_dapp::ui;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging()?;

    info!("Starting whitelist-dapp v{}", env!("CARGO_PKG_VERSION"));

    let config = DappConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    let key = DappConfig::signing_key_from_env().context("failed to read signing key")?;

    let session = WalletSession::from_config(&config, Arc::new(ConsoleAlert))
        .context("invalid whitelist configuration")?;
    let wallet = Arc::new(LocalWalletExtension::new(config.network.rpc_url.clone(), key));

    let connected = session.on_page_load(wallet).await;

    match cli.command() {
        Commands::Status => {}
        Commands::Connect => {
            print_snapshot(&session.snapshot(), cli.json)?;
            if !connected {
                anyhow::bail!("wallet is not connected");
            }
            return Ok(());
        }
        Commands::Count => {
            if !connected {
                anyhow::bail!("wallet is not connected");
            }
            let count = session.snapshot().whitelist_count;
            if cli.json {
                println!("{}", serde_json::json!({ "whitelist_count": count }));
            } else {
                println!("{}", ui::joined_line(count));
            }
            return Ok(());
        }
        Commands::Join => {
            if connected && !session.snapshot().whitelisted {
                if let Some(confirmation) = session.join_whitelist().await {
                    info!(tx_hash = ?confirmation.tx_hash, "Joined the whitelist");
                }
            }
        }
    }

    print_snapshot(&session.snapshot(), cli.json)
}

fn print_snapshot(snapshot: &SessionSnapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
    } else {
        println!("{}", ui::render_page(snapshot));
    }
    Ok(())
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout carries the rendered page only
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
