use std::{
    collections::VecDeque,
    fmt,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use tracing::{debug, warn};

use crate::{
    observer::{LedgerEvent, LedgerObserver},
    record::{AssetType, NewPrediction, PredictionRecord},
};

pub const DEFAULT_CAPACITY: usize = 1_000;

#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger capacity must be greater than zero")]
    ZeroCapacity,
}

#[derive(Debug, Default)]
struct LedgerState {
    // Newest first.
    records: VecDeque<PredictionRecord>,
    next_sequence: u64,
}

/// Bounded, newest-first store of prediction records.
///
/// Mutations serialize on a single write lock; reads clone out of a read lock
/// so callers never observe a half-applied insert or eviction. Observers run
/// after the lock is dropped.
pub struct PredictionLedger {
    capacity: usize,
    state: RwLock<LedgerState>,
    observers: Vec<Arc<dyn LedgerObserver>>,
}

impl Default for PredictionLedger {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            state: RwLock::new(LedgerState::default()),
            observers: Vec::new(),
        }
    }
}

impl fmt::Debug for PredictionLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictionLedger")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl PredictionLedger {
    pub fn new(capacity: usize) -> Result<Self, LedgerError> {
        if capacity == 0 {
            return Err(LedgerError::ZeroCapacity);
        }

        Ok(Self {
            capacity,
            ..Self::default()
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn LedgerObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.read_state().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Assigns an id, stores the record at the front and evicts the oldest
    /// records beyond capacity.
    ///
    /// Ids take the form `{slug}-{created_at_unix_ms}-{sequence}`; the sequence
    /// is ledger-wide, so two records minted in the same millisecond still get
    /// distinct ids.
    pub fn insert(&self, prediction: NewPrediction) -> PredictionRecord {
        let (record, evicted) = {
            let mut state = self.write_state();
            let sequence = state.next_sequence;
            state.next_sequence = sequence.wrapping_add(1);

            let id = format!(
                "{}-{}-{sequence}",
                prediction.asset_type.slug(),
                prediction.created_at.unix_timestamp_nanos() / 1_000_000,
            );
            let record = PredictionRecord::admit(id, prediction);
            state.records.push_front(record.clone());

            let mut evicted = 0usize;
            while state.records.len() > self.capacity {
                state.records.pop_back();
                evicted += 1;
            }

            (record, evicted)
        };

        debug!(
            id = %record.id,
            asset_type = record.asset_type.as_str(),
            predicted_value = record.predicted_value,
            confidence = record.confidence,
            evicted,
            "prediction logged"
        );
        self.publish(&LedgerEvent::PredictionLogged {
            id: record.id.clone(),
            asset_type: record.asset_type,
        });

        record
    }

    /// Back-fills the observed value for `id` and derives its accuracy.
    ///
    /// Returns `None` for unknown ids. A record is resolved at most once:
    /// later calls, and calls with a non-finite `actual_value`, return the
    /// stored record untouched and emit no event.
    pub fn resolve(&self, id: &str, actual_value: f64) -> Option<PredictionRecord> {
        if !actual_value.is_finite() {
            warn!(id, "ignoring non-finite actual value");
            return self.get(id);
        }

        let (record, newly_resolved) = {
            let mut state = self.write_state();
            let record = state.records.iter_mut().find(|record| record.id == id)?;
            if record.is_resolved() {
                (record.clone(), false)
            } else {
                record.resolve(actual_value);
                (record.clone(), true)
            }
        };

        if newly_resolved {
            let accuracy = record.accuracy.unwrap_or_default();
            debug!(id, actual_value, accuracy, "prediction resolved");
            self.publish(&LedgerEvent::PredictionResolved {
                id: record.id.clone(),
                accuracy,
            });
        } else {
            debug!(id, "prediction already resolved");
        }

        Some(record)
    }

    pub fn get(&self, id: &str) -> Option<PredictionRecord> {
        self.read_state()
            .records
            .iter()
            .find(|record| record.id == id)
            .cloned()
    }

    /// Newest-first page of records, optionally restricted to one asset type.
    /// The filter applies before `offset` and `limit`.
    pub fn list(
        &self,
        asset_type: Option<AssetType>,
        limit: usize,
        offset: usize,
    ) -> Vec<PredictionRecord> {
        self.read_state()
            .records
            .iter()
            .filter(|record| asset_type.map_or(true, |wanted| record.asset_type == wanted))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn snapshot(&self) -> Vec<PredictionRecord> {
        self.read_state().records.iter().cloned().collect()
    }

    fn publish(&self, event: &LedgerEvent) {
        for observer in &self.observers {
            observer.notify(event);
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, LedgerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, LedgerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
