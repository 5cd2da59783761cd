//! Run the screening pipeline for a list of NSE symbols.
//!
//! Usage:
//!   cargo run --bin screener              # built-in default watchlist
//!   cargo run --bin screener TCS INFY     # explicit symbols

use market_data::YahooClient;
use notification_service::{NotificationChannel, TelegramConfig, TelegramNotifier};
use screener_pipeline::{InMemoryMetrics, PipelineConfig, ScreenerPipeline};
use technical_analysis::IndicatorConfig;

const DEFAULT_SYMBOLS: &[&str] = &[
    "RELIANCE", "TCS", "HDFCBANK", "INFY", "ICICIBANK", "ITC", "SBIN", "LT", "BHARTIARTL",
    "ASIANPAINT",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "screener=info,screener_pipeline=info,market_data=info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let symbols: Vec<String> = if args.is_empty() {
        DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect()
    } else {
        args.iter().map(|s| s.trim().to_uppercase()).collect()
    };

    tracing::info!("Screening {} symbols", symbols.len());

    let config = PipelineConfig::from_env();
    let yahoo = YahooClient::new()?;
    let notifier: Option<Box<dyn NotificationChannel>> =
        TelegramNotifier::from_config(&TelegramConfig::from_env())
            .map(|n| Box::new(n) as Box<dyn NotificationChannel>);

    let mut pipeline = ScreenerPipeline::new(
        config,
        IndicatorConfig::default(),
        Box::new(yahoo),
        notifier,
        Box::new(InMemoryMetrics::new()),
    );

    pipeline.run(&symbols).await;

    if let Err(e) = pipeline.export_metrics() {
        tracing::warn!("Metrics export failed: {}", e);
    }

    Ok(())
}
