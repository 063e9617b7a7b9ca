use rand::Rng;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::info;

use crate::{
    ledger::PredictionLedger,
    record::{AssetType, NewPrediction, PredictionRecord},
};

const INDEX_BIAS: f64 = 5.0;
const CRYPTO_BIAS: f64 = -10.0;
const STABLE_EQUITY_BIAS: f64 = 3.0;
const VOLATILE_EQUITY_BIAS: f64 = -5.0;

const STABLE_EQUITIES: [&str; 3] = ["AAPL", "MSFT", "GOOGL"];
const VOLATILE_EQUITIES: [&str; 3] = ["TSLA", "NVDA", "COIN"];

/// Ramp used in place of an empty history, as multiples of the current value.
const SYNTHETIC_HISTORY_RAMP: [f64; 4] = [0.99, 0.995, 1.0, 1.005];

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ForecastRequest {
    pub asset_type: AssetType,
    #[serde(default)]
    pub symbol: Option<String>,
    pub horizon: String,
    pub current_value: f64,
    #[serde(default)]
    pub history: Vec<f64>,
}

/// Confidence nudge for the asset's known volatility profile.
pub fn bias_adjustment(asset_type: AssetType, symbol: Option<&str>) -> f64 {
    match asset_type {
        AssetType::Index => INDEX_BIAS,
        AssetType::Crypto => CRYPTO_BIAS,
        AssetType::Equity => {
            let Some(symbol) = symbol.map(str::trim) else {
                return 0.0;
            };
            if STABLE_EQUITIES.iter().any(|s| s.eq_ignore_ascii_case(symbol)) {
                STABLE_EQUITY_BIAS
            } else if VOLATILE_EQUITIES.iter().any(|s| s.eq_ignore_ascii_case(symbol)) {
                VOLATILE_EQUITY_BIAS
            } else {
                0.0
            }
        }
        AssetType::Portfolio => 0.0,
    }
}

pub fn synthetic_history(current_value: f64) -> Vec<f64> {
    SYNTHETIC_HISTORY_RAMP
        .iter()
        .map(|factor| current_value * factor)
        .collect()
}

/// A symbol is only kept when it names something more specific than the
/// asset type itself.
fn record_symbol(asset_type: AssetType, symbol: Option<String>) -> Option<String> {
    symbol
        .map(|symbol| symbol.trim().to_string())
        .filter(|symbol| !symbol.is_empty() && !symbol.eq_ignore_ascii_case(asset_type.as_str()))
}

/// Forecasts the request and logs the result in `ledger`.
pub fn submit_forecast<R: Rng + ?Sized>(
    ledger: &PredictionLedger,
    request: ForecastRequest,
    created_at: OffsetDateTime,
    rng: &mut R,
) -> PredictionRecord {
    let bias = bias_adjustment(request.asset_type, request.symbol.as_deref());
    let history = if request.history.is_empty() {
        synthetic_history(request.current_value)
    } else {
        request.history
    };
    let outcome = forecast::forecast(&history, bias, rng);

    let record = ledger.insert(NewPrediction {
        asset_type: request.asset_type,
        symbol: record_symbol(request.asset_type, request.symbol),
        created_at,
        observed_value: request.current_value,
        predicted_value: outcome.predicted_value,
        confidence: outcome.confidence,
        horizon: request.horizon,
    });

    info!(
        id = %record.id,
        asset_type = record.asset_type.as_str(),
        symbol = record.symbol.as_deref().unwrap_or(""),
        history_len = history.len(),
        bias,
        "forecast submitted"
    );

    record
}
