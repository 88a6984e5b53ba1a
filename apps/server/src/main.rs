//! Trade Alert Bot
//!
//! Polls the market contract for `Bought`/`Sold` events and posts alerts
//! to a Telegram channel.

mod config;
mod poller;

use clap::Parser;
use config::AppConfig;
use poller::{PollState, Poller};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use trade_alert_alerts::{Notifier, TelegramBot};
use trade_alert_chain::{ChainReader, MarketClient};

/// Trade Alert Bot CLI
#[derive(Parser, Debug)]
#[command(name = "trade-alert-bot")]
#[command(about = "Telegram alerts for on-chain market trades", long_about = None)]
struct Args {
    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Poll interval in seconds (overrides POLL_INTERVAL_SECS)
    #[arg(short, long)]
    interval_secs: Option<u64>,

    /// Blocks re-scanned below the head at startup (overrides BACK_SCAN_BLOCKS)
    #[arg(short, long)]
    back_scan: Option<u64>,

    /// Print the resolved configuration and exit
    #[arg(long, default_value_t = false)]
    print_config: bool,
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn init_logging(level: &str) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(level))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
    }
}

fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(secs) = args.interval_secs.filter(|s| *s > 0) {
        config.poll_interval_secs = secs;
    }
    if let Some(blocks) = args.back_scan {
        config.back_scan_blocks = blocks;
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    init_logging(&args.log_level);

    let mut config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("❌ Invalid configuration: {}", e);
            return;
        }
    };
    apply_overrides(&mut config, &args);

    if args.print_config {
        match serde_json::to_string_pretty(&config) {
            Ok(json) => println!("{json}"),
            Err(e) => error!("Failed to render configuration: {}", e),
        }
        return;
    }

    info!("🚀 Trade Alert Bot starting...");
    info!("  Contract: {}", config.contract_address);
    match config.token_address {
        Some(token) => info!("  Token: {}", token),
        None => info!("  Token: taken from each event"),
    }
    info!("  Poll interval: {}s", config.poll_interval_secs);
    info!("  Back-scan: {} blocks", config.back_scan_blocks);

    let client = match MarketClient::connect(&config.rpc_url, config.contract_address).await {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("❌ Critical startup error: {}", e);
            return;
        }
    };

    let head = match client.block_number().await {
        Ok(head) => head,
        Err(e) => {
            error!("❌ Critical startup error: {}", e);
            return;
        }
    };
    info!(block = head, "🟢 RPC connected");

    let sink = Arc::new(TelegramBot::new(&config.bot_token, &config.channel_id));
    let notifier = Notifier::new(client.clone(), sink, config.notifier_config());

    if let Err(e) = notifier.announce_online().await {
        warn!(error = %e, "Online announcement failed, continuing");
    }

    let state = PollState::starting_at(head, config.back_scan_blocks);
    info!(watermark = state.watermark, "Initial watermark");

    let poller = Poller::new(client, notifier, state);
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        warn!("Shutdown signal received");
    };

    info!("Press Ctrl+C to stop...");
    poller
        .run(Duration::from_secs(config.poll_interval_secs), shutdown)
        .await;

    info!("👋 Trade Alert Bot stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("WARN"), Level::WARN);
        assert_eq!(parse_level("unknown"), Level::INFO);
    }

    #[test]
    fn test_args_overrides() {
        let mut config = AppConfig::from_lookup(|key| match key {
            "BOT_TOKEN" => Some("t".to_string()),
            "CHANNEL_ID" => Some("-100".to_string()),
            "CONTRACT_ADDRESS" => Some("0x94abf62b41f815448eedbe9ec10f10576d9d6004".to_string()),
            "RPC_URL" => Some("http://localhost:8545".to_string()),
            _ => None,
        })
        .unwrap();

        let args = Args::parse_from(["trade-alert-bot", "--interval-secs", "3", "-b", "0"]);
        apply_overrides(&mut config, &args);
        assert_eq!(config.poll_interval_secs, 3);
        assert_eq!(config.back_scan_blocks, 0);

        let args = Args::parse_from(["trade-alert-bot", "--interval-secs", "0"]);
        apply_overrides(&mut config, &args);
        assert_eq!(config.poll_interval_secs, 3);
        assert!(!args.print_config);
    }
}
