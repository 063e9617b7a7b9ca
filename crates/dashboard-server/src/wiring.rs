use api::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::market_data::{MarketDataClient, MarketFeed, MarketSeries};

pub fn build_app(state: AppState, market: MarketDataClient) -> Router {
    let market_routes = Router::new()
        .route("/market/:feed", get(market_series))
        .with_state(market);

    api::app_with_state(state)
        .route("/health", get(healthcheck))
        .merge(market_routes)
}

async fn healthcheck() -> &'static str {
    "ok"
}

async fn market_series(
    State(market): State<MarketDataClient>,
    Path(feed): Path<String>,
) -> Result<Json<MarketSeries>, StatusCode> {
    let feed = MarketFeed::parse(&feed).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(market.series(feed).await))
}
