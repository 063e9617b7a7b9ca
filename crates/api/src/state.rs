use std::sync::{Arc, Mutex, PoisonError};

use predictions::{
    seed_demo_history, submit_forecast, AssetType, ForecastRequest, LedgerError, LedgerEvent,
    LedgerObserver, PredictionLedger, PredictionRecord,
};
use rand::{rngs::StdRng, SeedableRng};
use time::OffsetDateTime;
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum DashboardEvent {
    Connected,
    PredictionLogged { id: String, asset_type: AssetType },
    PredictionResolved { id: String, accuracy: f64 },
}

impl DashboardEvent {
    pub fn connected() -> Self {
        Self::Connected
    }
}

impl From<&LedgerEvent> for DashboardEvent {
    fn from(event: &LedgerEvent) -> Self {
        match event {
            LedgerEvent::PredictionLogged { id, asset_type } => Self::PredictionLogged {
                id: id.clone(),
                asset_type: *asset_type,
            },
            LedgerEvent::PredictionResolved { id, accuracy } => Self::PredictionResolved {
                id: id.clone(),
                accuracy: *accuracy,
            },
        }
    }
}

/// Forwards ledger changes to WebSocket subscribers so open dashboards know
/// to refresh.
struct BroadcastObserver {
    events_tx: broadcast::Sender<DashboardEvent>,
}

impl LedgerObserver for BroadcastObserver {
    fn notify(&self, event: &LedgerEvent) {
        // No subscribers is the common case between page loads.
        let _ = self.events_tx.send(event.into());
    }
}

#[derive(Clone, Debug)]
pub struct AppState {
    ledger: Arc<PredictionLedger>,
    rng: Arc<Mutex<StdRng>>,
    events_tx: broadcast::Sender<DashboardEvent>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::assemble(PredictionLedger::default(), StdRng::from_entropy())
    }
}

impl AppState {
    /// Builds state around a ledger of `ledger_capacity` records. A
    /// `forecast_seed` makes the forecast noise reproducible across runs.
    pub fn new(ledger_capacity: usize, forecast_seed: Option<u64>) -> Result<Self, LedgerError> {
        let ledger = PredictionLedger::new(ledger_capacity)?;
        let rng = match forecast_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self::assemble(ledger, rng))
    }

    fn assemble(ledger: PredictionLedger, rng: StdRng) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let ledger = ledger.with_observer(Arc::new(BroadcastObserver {
            events_tx: events_tx.clone(),
        }));

        Self {
            ledger: Arc::new(ledger),
            rng: Arc::new(Mutex::new(rng)),
            events_tx,
        }
    }

    pub fn ledger(&self) -> &PredictionLedger {
        &self.ledger
    }

    pub fn submit_forecast(&self, request: ForecastRequest) -> PredictionRecord {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        submit_forecast(&self.ledger, request, OffsetDateTime::now_utc(), &mut *rng)
    }

    pub fn seed_demo_history(&self, days: u32) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        seed_demo_history(&self.ledger, OffsetDateTime::now_utc(), days, &mut *rng)
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events_tx.subscribe()
    }

    #[cfg(test)]
    pub(crate) fn with_seed_for_test(seed: u64) -> Self {
        Self::assemble(PredictionLedger::default(), StdRng::seed_from_u64(seed))
    }
}
