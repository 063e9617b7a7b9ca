use std::ops::Range;

use rand::Rng;
use serde::Serialize;
use serde_json::Value;
use time::{format_description::well_known::Rfc3339, Duration, OffsetDateTime};
use tracing::{debug, warn};

const ALPHA_VANTAGE_URL: &str = "https://www.alphavantage.co/query";
const USER_AGENT: &str = "prediction-dashboard/0.1";

pub const SERIES_LEN: usize = 20;
const SYNTHETIC_SPACING_MINUTES: i64 = 15;

/// Alpha Vantage reports quota and key problems as a 200 with one of these
/// fields instead of the series.
const API_MESSAGE_KEYS: [&str; 3] = ["Error Message", "Note", "Information"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketFeed {
    Nasdaq,
    Bitcoin,
}

struct SyntheticProfile {
    base: Range<f64>,
    volatility: f64,
    trend: f64,
}

impl MarketFeed {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "nasdaq" => Some(Self::Nasdaq),
            "bitcoin" => Some(Self::Bitcoin),
            _ => None,
        }
    }

    fn query(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Nasdaq => &[
                ("function", "TIME_SERIES_INTRADAY"),
                ("symbol", "QQQ"),
                ("interval", "5min"),
            ],
            Self::Bitcoin => &[
                ("function", "DIGITAL_CURRENCY_INTRADAY"),
                ("symbol", "BTC"),
                ("market", "USD"),
            ],
        }
    }

    fn series_key(self) -> &'static str {
        match self {
            Self::Nasdaq => "Time Series (5min)",
            Self::Bitcoin => "Time Series (Digital Currency Intraday)",
        }
    }

    fn value_key(self) -> &'static str {
        match self {
            Self::Nasdaq => "4. close",
            Self::Bitcoin => "1a. price (USD)",
        }
    }

    fn synthetic_profile(self) -> SyntheticProfile {
        match self {
            Self::Nasdaq => SyntheticProfile {
                base: 16_000.0..17_000.0,
                volatility: 0.003,
                trend: 0.000_5,
            },
            Self::Bitcoin => SyntheticProfile {
                base: 60_000.0..65_000.0,
                volatility: 0.005,
                trend: 0.001,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketPoint {
    pub time: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesSource {
    AlphaVantage,
    Synthetic,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSeries {
    pub feed: MarketFeed,
    pub source: SeriesSource,
    pub points: Vec<MarketPoint>,
}

#[derive(Debug, thiserror::Error)]
pub enum MarketDataError {
    #[error("market data request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("no Alpha Vantage API key configured")]
    MissingApiKey,
    #[error("alpha vantage api error: {0}")]
    Api(String),
    #[error("response has no `{0}` series")]
    MissingSeries(&'static str),
    #[error("response series is empty")]
    EmptySeries,
    #[error("point at {time} has no usable `{key}` value")]
    InvalidValue { time: String, key: &'static str },
}

/// Extracts the most recent [`SERIES_LEN`] points of `feed` from an Alpha
/// Vantage response, oldest first.
pub fn parse_alpha_vantage_series(
    feed: MarketFeed,
    payload: &Value,
) -> Result<Vec<MarketPoint>, MarketDataError> {
    let series = payload
        .get(feed.series_key())
        .and_then(Value::as_object)
        .ok_or(MarketDataError::MissingSeries(feed.series_key()))?;
    if series.is_empty() {
        return Err(MarketDataError::EmptySeries);
    }

    let mut points = series
        .iter()
        .map(|(time, values)| {
            let value = values
                .get(feed.value_key())
                .and_then(|raw| match raw {
                    Value::String(text) => text.trim().parse::<f64>().ok(),
                    other => other.as_f64(),
                })
                .filter(|value| value.is_finite())
                .ok_or_else(|| MarketDataError::InvalidValue {
                    time: time.clone(),
                    key: feed.value_key(),
                })?;

            Ok(MarketPoint {
                time: time.clone(),
                value,
            })
        })
        .collect::<Result<Vec<_>, MarketDataError>>()?;

    // Alpha Vantage timestamps are `YYYY-MM-DD hh:mm:ss`, so text order is time order.
    points.sort_by(|left, right| left.time.cmp(&right.time));
    let skip = points.len().saturating_sub(SERIES_LEN);
    Ok(points.split_off(skip))
}

/// Random-walk stand-in used whenever live data is unavailable: a drifting
/// series of [`SERIES_LEN`] points spaced 15 minutes apart, ending just
/// before `now`.
pub fn synthetic_series<R: Rng + ?Sized>(
    feed: MarketFeed,
    now: OffsetDateTime,
    rng: &mut R,
) -> Vec<MarketPoint> {
    let profile = feed.synthetic_profile();
    let base = rng.gen_range(profile.base.clone());

    (0..SERIES_LEN)
        .map(|step| {
            let minutes_back = (SERIES_LEN - step) as i64 * SYNTHETIC_SPACING_MINUTES;
            let at = now
                .checked_sub(Duration::minutes(minutes_back))
                .unwrap_or(now);
            let noise = rng.gen_range(-1.0..1.0) * profile.volatility;
            let value = base * (1.0 + noise + profile.trend * step as f64);

            MarketPoint {
                time: at
                    .format(&Rfc3339)
                    .unwrap_or_else(|_| at.unix_timestamp().to_string()),
                value: (value * 100.0).round() / 100.0,
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct MarketDataClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl MarketDataClient {
    pub fn new(api_key: Option<String>) -> Result<Self, MarketDataError> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            http,
            api_key,
            base_url: ALPHA_VANTAGE_URL.to_string(),
        })
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub async fn fetch(&self, feed: MarketFeed) -> Result<Vec<MarketPoint>, MarketDataError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(MarketDataError::MissingApiKey)?;

        let payload: Value = self
            .http
            .get(&self.base_url)
            .query(feed.query())
            .query(&[("apikey", api_key)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(message) = API_MESSAGE_KEYS
            .iter()
            .find_map(|key| payload.get(*key).and_then(Value::as_str))
        {
            return Err(MarketDataError::Api(message.to_string()));
        }

        parse_alpha_vantage_series(feed, &payload)
    }

    /// Never fails: any fetch problem degrades to a synthetic series.
    pub async fn series(&self, feed: MarketFeed) -> MarketSeries {
        match self.fetch(feed).await {
            Ok(points) => MarketSeries {
                feed,
                source: SeriesSource::AlphaVantage,
                points,
            },
            Err(MarketDataError::MissingApiKey) => {
                debug!(?feed, "no api key, serving synthetic market data");
                synthetic_fallback(feed)
            }
            Err(err) => {
                warn!(?feed, error = %err, "market data fetch failed, serving synthetic series");
                synthetic_fallback(feed)
            }
        }
    }
}

fn synthetic_fallback(feed: MarketFeed) -> MarketSeries {
    MarketSeries {
        feed,
        source: SeriesSource::Synthetic,
        points: synthetic_series(feed, OffsetDateTime::now_utc(), &mut rand::thread_rng()),
    }
}
