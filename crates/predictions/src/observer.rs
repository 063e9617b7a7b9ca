use std::sync::{Mutex, PoisonError};

use serde::Serialize;

use crate::record::AssetType;

/// Change notifications emitted by the ledger after its lock is released.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum LedgerEvent {
    PredictionLogged { id: String, asset_type: AssetType },
    PredictionResolved { id: String, accuracy: f64 },
}

pub trait LedgerObserver: Send + Sync {
    fn notify(&self, event: &LedgerEvent);
}

#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<LedgerEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LedgerObserver for RecordingObserver {
    fn notify(&self, event: &LedgerEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
