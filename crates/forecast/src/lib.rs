pub mod stats;
pub mod trend;

pub use stats::{mean, population_std_dev};
pub use trend::{
    confidence_for, forecast, Forecast, FALLBACK_VOLATILITY_PCT, MAX_CONFIDENCE, MIN_CONFIDENCE,
    SHORT_HISTORY_CONFIDENCE, TREND_WINDOW,
};
