mod config;
mod market_data;
mod wiring;

use std::error::Error;

use api::AppState;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{config::Config, market_data::MarketDataClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    let state = AppState::new(config.ledger_capacity, config.forecast_seed)?;
    if config.seed_demo {
        let seeded = state.seed_demo_history(config.demo_days);
        info!(seeded, days = config.demo_days, "seeded demo prediction history");
    }

    let market = MarketDataClient::new(config.alpha_vantage_api_key.clone())?;
    if config.alpha_vantage_api_key.is_none() {
        info!("ALPHA_VANTAGE_API_KEY unset, market feeds will be synthetic");
    }

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!(addr = %config.listen_addr, "dashboard server listening");

    axum::serve(listener, wiring::build_app(state, market)).await?;
    Ok(())
}
