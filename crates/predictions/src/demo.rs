use std::ops::Range;

use rand::Rng;
use time::{Duration, OffsetDateTime};

use crate::{
    ledger::PredictionLedger,
    record::{AssetType, NewPrediction},
};

const DEMO_HORIZON: &str = "24h";

struct DemoProfile {
    asset_type: AssetType,
    observed: Range<f64>,
    predicted_drift: Range<f64>,
    actual_drift: Range<f64>,
    confidence: Range<f64>,
}

const DEMO_PROFILES: [DemoProfile; 2] = [
    DemoProfile {
        asset_type: AssetType::Index,
        observed: 16_000.0..17_000.0,
        predicted_drift: -0.03..0.07,
        actual_drift: -0.03..0.05,
        confidence: 70.0..95.0,
    },
    DemoProfile {
        asset_type: AssetType::Crypto,
        observed: 60_000.0..65_000.0,
        predicted_drift: -0.05..0.10,
        actual_drift: -0.06..0.06,
        confidence: 65.0..90.0,
    },
];

/// Fills `ledger` with one index and one crypto prediction per day for the
/// last `days` days plus today. Every day before today is already resolved.
///
/// Records go in oldest first so the ledger stays newest-first. Returns the
/// number of records inserted.
pub fn seed_demo_history<R: Rng + ?Sized>(
    ledger: &PredictionLedger,
    now: OffsetDateTime,
    days: u32,
    rng: &mut R,
) -> usize {
    let mut inserted = 0;

    for days_ago in (0..=days).rev() {
        let created_at = now
            .checked_sub(Duration::days(i64::from(days_ago)))
            .unwrap_or(now);

        for profile in &DEMO_PROFILES {
            let observed_value = rng.gen_range(profile.observed.clone());
            let predicted_value =
                observed_value * (1.0 + rng.gen_range(profile.predicted_drift.clone()));
            let record = ledger.insert(NewPrediction {
                asset_type: profile.asset_type,
                symbol: None,
                created_at,
                observed_value,
                predicted_value,
                confidence: rng.gen_range(profile.confidence.clone()),
                horizon: DEMO_HORIZON.to_string(),
            });
            inserted += 1;

            if days_ago > 0 {
                let actual_value =
                    observed_value * (1.0 + rng.gen_range(profile.actual_drift.clone()));
                ledger.resolve(&record.id, actual_value);
            }
        }
    }

    inserted
}
