//! Answer state: which questions were answered, and how.

use crate::error::StoreError;
use crate::storage::{KeyValueStore, ANSWER_STATE_KEY};
use crate::types::{AnswerStats, Outcome};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Outcome per question number. Serializes as `{"12": "correct", ...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerState {
    entries: BTreeMap<u32, Outcome>,
}

impl AnswerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outcome, replacing any earlier one.
    pub fn record(&mut self, number: u32, outcome: Outcome) {
        self.entries.insert(number, outcome);
    }

    pub fn get(&self, number: u32) -> Option<Outcome> {
        self.entries.get(&number).copied()
    }

    pub fn is_answered(&self, number: u32) -> bool {
        self.entries.contains_key(&number)
    }

    pub fn stats(&self) -> AnswerStats {
        let correct_count = self.entries.values().filter(|o| o.is_correct()).count();
        let wrong_count = self.entries.len() - correct_count;
        AnswerStats {
            correct_count,
            wrong_count,
            total_answered: correct_count + wrong_count,
        }
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, Outcome)> + '_ {
        self.entries.iter().map(|(n, o)| (*n, *o))
    }
}

impl FromIterator<(u32, Outcome)> for AnswerState {
    fn from_iter<I: IntoIterator<Item = (u32, Outcome)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Answer state that snapshots itself to a key-value store after every change.
pub struct AnswerStore {
    state: AnswerState,
    store: Arc<dyn KeyValueStore>,
}

impl AnswerStore {
    /// Restore the last snapshot. Missing or corrupt snapshots start empty.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let state = match store.get(ANSWER_STATE_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "corrupt answer snapshot, starting empty");
                AnswerState::new()
            }),
            Ok(None) => AnswerState::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read answer snapshot, starting empty");
                AnswerState::new()
            }
        };
        Self { state, store }
    }

    /// Record an outcome and persist. The in-memory change is kept even if persisting fails.
    pub fn record(&mut self, number: u32, outcome: Outcome) -> Result<(), StoreError> {
        self.state.record(number, outcome);
        self.persist()
    }

    pub fn get(&self, number: u32) -> Option<Outcome> {
        self.state.get(number)
    }

    pub fn is_answered(&self, number: u32) -> bool {
        self.state.is_answered(number)
    }

    pub fn stats(&self) -> AnswerStats {
        self.state.stats()
    }

    pub fn state(&self) -> &AnswerState {
        &self.state
    }

    /// Clear every entry and drop the snapshot.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.state.reset();
        self.store.remove(ANSWER_STATE_KEY)
    }

    fn persist(&self) -> Result<(), StoreError> {
        let snapshot = serde_json::to_string(&self.state)?;
        self.store.set(ANSWER_STATE_KEY, &snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;

    fn memory() -> Arc<dyn KeyValueStore> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn record_overwrites_previous_outcome() {
        let mut state = AnswerState::new();
        state.record(1, Outcome::Wrong);
        state.record(1, Outcome::Correct);
        assert_eq!(state.get(1), Some(Outcome::Correct));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn stats_count_every_entry() {
        let state: AnswerState = [(1, Outcome::Correct), (2, Outcome::Wrong), (3, Outcome::Correct)]
            .into_iter()
            .collect();
        assert_eq!(
            state.stats(),
            AnswerStats {
                correct_count: 2,
                wrong_count: 1,
                total_answered: 3,
            }
        );
    }

    #[test]
    fn snapshot_uses_number_keyed_object() {
        let state: AnswerState = [(12, Outcome::Correct), (3, Outcome::Wrong)].into_iter().collect();
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"3":"wrong","12":"correct"}"#);
    }

    #[test]
    fn store_persists_and_restores() {
        let backend = memory();
        let mut store = AnswerStore::load(backend.clone());
        store.record(5, Outcome::Correct).unwrap();
        store.record(6, Outcome::Wrong).unwrap();

        let restored = AnswerStore::load(backend);
        assert_eq!(restored.get(5), Some(Outcome::Correct));
        assert_eq!(restored.get(6), Some(Outcome::Wrong));
        assert!(!restored.is_answered(7));
    }

    #[test]
    fn reset_clears_snapshot() {
        let backend = memory();
        let mut store = AnswerStore::load(backend.clone());
        store.record(1, Outcome::Correct).unwrap();
        store.reset().unwrap();

        assert!(store.state().is_empty());
        assert_eq!(backend.get(ANSWER_STATE_KEY).unwrap(), None);
        assert!(AnswerStore::load(backend).state().is_empty());
    }

    #[test]
    fn corrupt_snapshot_starts_empty() {
        let backend = memory();
        backend.set(ANSWER_STATE_KEY, "[1, 2").unwrap();
        assert!(AnswerStore::load(backend.clone()).state().is_empty());

        backend.set(ANSWER_STATE_KEY, r#"{"1":"maybe"}"#).unwrap();
        assert!(AnswerStore::load(backend).state().is_empty());
    }
}
