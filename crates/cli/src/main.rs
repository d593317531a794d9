use std::sync::Arc;
use std::time::Duration;

use arb_arbitrage::{ArbitrageScanner, PaperExecutor};
use arb_core::{Config, ConfigLoader, ExchangeFeed, Mode, TracingLogSink};
use arb_exchange_binance::BinanceFeed;
use arb_exchange_bybit::BybitFeed;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

const BINANCE_VENUE: &str = "binance";
const BYBIT_VENUE: &str = "bybit";
const BINANCE_WS_BASE: &str = "wss://fstream.binance.example/ws";
const BYBIT_WS_URL: &str = "wss://stream.bybit.example/v5/public/linear";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("startup failed: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let config = ConfigLoader::load()?;
    tracing::info!(
        "loaded config: {} symbols, mode={:?}, check_interval={}s",
        config.symbols.len(),
        config.mode,
        config.check_interval_sec
    );

    let log = Arc::new(TracingLogSink);

    let binance: Arc<dyn ExchangeFeed> = Arc::new(BinanceFeed::new(
        BINANCE_VENUE,
        BINANCE_WS_BASE,
        log.clone(),
    ));
    let bybit: Arc<dyn ExchangeFeed> =
        Arc::new(BybitFeed::new(BYBIT_VENUE, BYBIT_WS_URL, log.clone()));

    binance.connect().await?;
    bybit.connect().await?;

    for symbol in &config.symbols {
        binance.subscribe(symbol).await?;
        bybit.subscribe(symbol).await?;
    }

    let mut scanner = build_scanner(&config, log.clone());

    for symbol in &config.symbols {
        let Some(binance_book) = binance.order_book(symbol) else {
            continue;
        };
        let Some(bybit_book) = bybit.order_book(symbol) else {
            continue;
        };

        if config.mode == Mode::Paper {
            let fee = Decimal::from_f64(config.fees).unwrap_or_default();
            scanner.register_venue(
                symbol,
                BINANCE_VENUE,
                binance_book,
                Arc::new(PaperExecutor::new(BINANCE_VENUE, fee)),
            );
            scanner.register_venue(
                symbol,
                BYBIT_VENUE,
                bybit_book,
                Arc::new(PaperExecutor::new(BYBIT_VENUE, fee)),
            );
        }
    }

    scanner.run().await;
    Ok(())
}

fn build_scanner(config: &Config, log: Arc<TracingLogSink>) -> ArbitrageScanner {
    ArbitrageScanner::new(
        config.symbols.clone(),
        Decimal::from_f64(config.max_pos_usd).unwrap_or_default(),
        Decimal::from_f64(config.min_spread_percent).unwrap_or_default(),
        Decimal::from_f64(config.rebalance_min_spread).unwrap_or_default(),
        Duration::from_secs(config.check_interval_sec),
        log,
    )
}
