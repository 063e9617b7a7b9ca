use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    Index,
    Crypto,
    Equity,
    Portfolio,
}

impl AssetType {
    pub const ALL: [AssetType; 4] = [Self::Index, Self::Crypto, Self::Equity, Self::Portfolio];

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|asset_type| asset_type.as_str().eq_ignore_ascii_case(value.trim()))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Index => "INDEX",
            Self::Crypto => "CRYPTO",
            Self::Equity => "EQUITY",
            Self::Portfolio => "PORTFOLIO",
        }
    }

    /// Lowercase prefix used when minting record ids.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Crypto => "crypto",
            Self::Equity => "equity",
            Self::Portfolio => "portfolio",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RecordState {
    Created,
    Resolved,
}

/// A forecast waiting to be admitted to the ledger; the ledger assigns the id.
#[derive(Clone, Debug, PartialEq)]
pub struct NewPrediction {
    pub asset_type: AssetType,
    pub symbol: Option<String>,
    pub created_at: OffsetDateTime,
    pub observed_value: f64,
    pub predicted_value: f64,
    pub confidence: f64,
    pub horizon: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PredictionRecord {
    pub id: String,
    pub asset_type: AssetType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub observed_value: f64,
    pub predicted_value: f64,
    pub confidence: f64,
    pub horizon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl PredictionRecord {
    pub(crate) fn admit(id: String, prediction: NewPrediction) -> Self {
        Self {
            id,
            asset_type: prediction.asset_type,
            symbol: prediction.symbol,
            created_at: prediction.created_at,
            observed_value: prediction.observed_value,
            predicted_value: prediction.predicted_value,
            confidence: prediction.confidence,
            horizon: prediction.horizon,
            actual_value: None,
            accuracy: None,
        }
    }

    pub fn state(&self) -> RecordState {
        if self.actual_value.is_some() {
            RecordState::Resolved
        } else {
            RecordState::Created
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.state() == RecordState::Resolved
    }

    pub(crate) fn resolve(&mut self, actual_value: f64) {
        self.actual_value = Some(actual_value);
        self.accuracy = Some(accuracy(self.predicted_value, actual_value));
    }
}

/// `100 - |relative error %|`. Unclamped, so a miss by more than 100% scores
/// below zero. A zero prediction, or any non-finite result, scores `0.0`.
pub fn accuracy(predicted_value: f64, actual_value: f64) -> f64 {
    if predicted_value == 0.0 {
        return 0.0;
    }

    let score = 100.0 - ((actual_value - predicted_value) / predicted_value * 100.0).abs();
    if score.is_finite() {
        score
    } else {
        0.0
    }
}
