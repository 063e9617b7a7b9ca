use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::stats::{mean, population_std_dev};

pub const TREND_WINDOW: usize = 5;
pub const SHORT_HISTORY_CONFIDENCE: f64 = 60.0;
pub const FALLBACK_VOLATILITY_PCT: f64 = 0.02;
pub const MIN_CONFIDENCE: f64 = 50.0;
pub const MAX_CONFIDENCE: f64 = 95.0;

const BASE_CONFIDENCE: f64 = 90.0;
const VOLATILITY_PENALTY: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub predicted_value: f64,
    pub confidence: f64,
}

/// Projects the next value of `history` (oldest first) from the average
/// fractional change across the trailing window, plus noise scaled by the
/// series volatility.
///
/// Non-finite observations are dropped up front. With fewer than
/// [`TREND_WINDOW`] points the last observation (or `0.0`) is returned at
/// [`SHORT_HISTORY_CONFIDENCE`] and `bias_adjustment` is ignored.
///
/// The only source of non-determinism is `rng`; pass a seeded generator to
/// reproduce a forecast.
pub fn forecast<R: Rng + ?Sized>(history: &[f64], bias_adjustment: f64, rng: &mut R) -> Forecast {
    let history: Vec<f64> = history
        .iter()
        .copied()
        .filter(|value| value.is_finite())
        .collect();

    if history.len() < TREND_WINDOW {
        return Forecast {
            predicted_value: history.last().copied().unwrap_or(0.0),
            confidence: SHORT_HISTORY_CONFIDENCE,
        };
    }

    let window = &history[history.len() - TREND_WINDOW..];
    let last = window[TREND_WINDOW - 1];
    let baseline = last * (1.0 + trend_rate(window));
    let volatility_pct = volatility_pct(&history, mean(window));

    let unit: f64 = rng.gen_range(-1.0..1.0);
    let noise = unit * volatility_pct * baseline / 100.0;
    let predicted_value = baseline + noise;

    Forecast {
        predicted_value: if predicted_value.is_finite() {
            predicted_value
        } else {
            last
        },
        confidence: confidence_for(volatility_pct, bias_adjustment),
    }
}

/// Maps a volatility percentage to a confidence score in
/// `[MIN_CONFIDENCE, MAX_CONFIDENCE]`, clamping both before and after the bias
/// is applied.
pub fn confidence_for(volatility_pct: f64, bias_adjustment: f64) -> f64 {
    let bias = if bias_adjustment.is_finite() {
        bias_adjustment
    } else {
        0.0
    };
    let raw = (BASE_CONFIDENCE - volatility_pct * VOLATILITY_PENALTY)
        .clamp(MIN_CONFIDENCE, MAX_CONFIDENCE);

    (raw + bias).clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

/// Average period-over-period fractional change. A step away from exactly
/// zero contributes no change.
fn trend_rate(window: &[f64]) -> f64 {
    let changes: Vec<f64> = window
        .windows(2)
        .map(|pair| {
            if pair[0] == 0.0 {
                0.0
            } else {
                (pair[1] - pair[0]) / pair[0]
            }
        })
        .collect();

    let rate = mean(&changes);
    if rate.is_finite() {
        rate
    } else {
        0.0
    }
}

fn volatility_pct(history: &[f64], window_mean: f64) -> f64 {
    if window_mean == 0.0 {
        return FALLBACK_VOLATILITY_PCT;
    }

    let volatility = population_std_dev(history) / window_mean.abs() * 100.0;
    if volatility.is_finite() && volatility > 0.0 {
        volatility
    } else {
        FALLBACK_VOLATILITY_PCT
    }
}
