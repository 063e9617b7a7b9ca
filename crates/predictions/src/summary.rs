use serde::Serialize;

use crate::record::{AssetType, PredictionRecord};

/// Accuracy above which a resolved prediction counts as correct.
pub const CORRECT_ACCURACY_THRESHOLD: f64 = 70.0;

const CONFIDENCE_BUCKETS: [(&str, f64, f64); 6] = [
    ("90-100%", 90.0, 100.0),
    ("80-90%", 80.0, 90.0),
    ("70-80%", 70.0, 80.0),
    ("60-70%", 60.0, 70.0),
    ("50-60%", 50.0, 60.0),
    ("<50%", 0.0, 50.0),
];

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AccuracyMetrics {
    pub average: f64,
    pub correct: usize,
    pub total: usize,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct DirectionMetrics {
    pub up: usize,
    pub down: usize,
    pub up_correct: usize,
    pub down_correct: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AssetAccuracy {
    pub asset_type: AssetType,
    pub average_accuracy: f64,
    pub count: usize,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ConfidenceBucket {
    pub label: &'static str,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LedgerSummary {
    pub accuracy: AccuracyMetrics,
    pub direction: DirectionMetrics,
    pub by_asset_type: Vec<AssetAccuracy>,
    pub confidence_distribution: Vec<ConfidenceBucket>,
}

pub fn summarize(records: &[PredictionRecord]) -> LedgerSummary {
    LedgerSummary {
        accuracy: accuracy_metrics(records),
        direction: direction_metrics(records),
        by_asset_type: AssetType::ALL
            .into_iter()
            .map(|asset_type| asset_accuracy(records, asset_type))
            .collect(),
        confidence_distribution: confidence_distribution(records),
    }
}

fn accuracy_metrics(records: &[PredictionRecord]) -> AccuracyMetrics {
    let scores: Vec<f64> = records.iter().filter_map(|record| record.accuracy).collect();

    AccuracyMetrics {
        average: forecast::mean(&scores),
        correct: scores
            .iter()
            .filter(|score| **score > CORRECT_ACCURACY_THRESHOLD)
            .count(),
        total: scores.len(),
    }
}

/// "Up" calls predicted above the observed value; a call is correct when the
/// actual moved the same way.
fn direction_metrics(records: &[PredictionRecord]) -> DirectionMetrics {
    let mut metrics = DirectionMetrics::default();

    for record in records {
        let Some(actual) = record.actual_value else {
            continue;
        };
        if record.predicted_value > record.observed_value {
            metrics.up += 1;
            if actual > record.observed_value {
                metrics.up_correct += 1;
            }
        } else {
            metrics.down += 1;
            if actual <= record.observed_value {
                metrics.down_correct += 1;
            }
        }
    }

    metrics
}

fn asset_accuracy(records: &[PredictionRecord], asset_type: AssetType) -> AssetAccuracy {
    let scores: Vec<f64> = records
        .iter()
        .filter(|record| record.asset_type == asset_type)
        .filter_map(|record| record.accuracy)
        .collect();

    AssetAccuracy {
        asset_type,
        average_accuracy: forecast::mean(&scores),
        count: scores.len(),
    }
}

fn confidence_distribution(records: &[PredictionRecord]) -> Vec<ConfidenceBucket> {
    CONFIDENCE_BUCKETS
        .iter()
        .map(|&(label, min, max)| ConfidenceBucket {
            label,
            count: records
                .iter()
                .filter(|record| (min..max).contains(&record.confidence))
                .count(),
        })
        .collect()
}
