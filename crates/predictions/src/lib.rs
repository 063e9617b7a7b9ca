pub mod demo;
pub mod ledger;
pub mod observer;
pub mod record;
pub mod request;
pub mod summary;

pub use demo::seed_demo_history;
pub use ledger::{LedgerError, PredictionLedger, DEFAULT_CAPACITY};
pub use observer::{LedgerEvent, LedgerObserver, RecordingObserver};
pub use record::{accuracy, AssetType, NewPrediction, PredictionRecord, RecordState};
pub use request::{bias_adjustment, submit_forecast, synthetic_history, ForecastRequest};
pub use summary::{summarize, LedgerSummary};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::{rngs::StdRng, SeedableRng};
    use time::macros::datetime;

    use crate::{
        submit_forecast, summarize, AssetType, ForecastRequest, LedgerEvent, PredictionLedger,
        RecordingObserver,
    };

    #[test]
    fn forecast_then_resolve_flows_through_ledger_and_summary() {
        let observer = Arc::new(RecordingObserver::new());
        let ledger = PredictionLedger::new(10).unwrap().with_observer(observer.clone());
        let mut rng = StdRng::seed_from_u64(21);

        let record = submit_forecast(
            &ledger,
            ForecastRequest {
                asset_type: AssetType::Crypto,
                symbol: Some("BTC".to_string()),
                horizon: "24h".to_string(),
                current_value: 64_650.0,
                history: vec![64_000.0, 64_150.0, 63_900.0, 64_400.0, 64_700.0, 64_650.0],
            },
            datetime!(2025-02-01 00:00 UTC),
            &mut rng,
        );
        let resolved = ledger.resolve(&record.id, record.predicted_value).unwrap();

        assert_eq!(resolved.accuracy, Some(100.0));
        assert_eq!(observer.events().len(), 2);
        assert!(matches!(
            observer.events()[1],
            LedgerEvent::PredictionResolved { .. }
        ));

        let summary = summarize(&ledger.list(Some(AssetType::Crypto), 100, 0));
        assert_eq!(summary.accuracy.total, 1);
        assert_eq!(summary.accuracy.correct, 1);
    }
}
