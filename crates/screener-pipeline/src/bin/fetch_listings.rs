//! Download NSE main-board and SME listings into the raw data directory.

use market_data::{Board, ListedCompany, NseClient};
use screener_pipeline::PipelineConfig;
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fetch_listings=info,market_data=info".into()),
        )
        .init();

    let config = PipelineConfig::from_env();
    let nse = NseClient::new()?;

    let main_board = nse.fetch_listings(Board::Main).await?;
    save_listings(&config.listings_csv(), &main_board)?;
    tracing::info!(
        "Saved {} main-board companies to {}",
        main_board.len(),
        config.listings_csv().display()
    );

    match nse.fetch_listings(Board::Sme).await {
        Ok(sme) => {
            save_listings(&config.sme_listings_csv(), &sme)?;
            tracing::info!(
                "Saved {} SME companies to {}",
                sme.len(),
                config.sme_listings_csv().display()
            );
        }
        Err(e) => tracing::warn!("SME listing download failed: {}", e),
    }

    Ok(())
}

fn save_listings(path: &Path, companies: &[ListedCompany]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["symbol", "name"])?;
    for company in companies {
        writer.write_record([company.symbol.as_str(), company.name.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}
