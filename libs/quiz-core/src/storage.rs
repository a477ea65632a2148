//! Key-value persistence for quiz progress and settings.

use crate::error::StoreError;
use crate::types::FilterConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

/// Key holding the answer-state snapshot (JSON object of number -> outcome).
pub const ANSWER_STATE_KEY: &str = "answer_state";
/// Key holding the current question index as a decimal string.
pub const CURRENT_INDEX_KEY: &str = "current_index";
/// Key holding the versioned settings record.
pub const SETTINGS_KEY: &str = "settings";

/// Flat keys written by earlier versions, read once for migration.
pub mod legacy {
    pub const RANGE_ENABLED: &str = "range_enabled";
    pub const RANGE_START: &str = "range_start";
    pub const RANGE_END: &str = "range_end";
    pub const RANDOM_JUMP_ENABLED: &str = "random_jump_enabled";

    pub const ALL: [&str; 4] = [RANGE_ENABLED, RANGE_START, RANGE_END, RANDOM_JUMP_ENABLED];
}

/// Durable string key-value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".into()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries()?.remove(key);
        Ok(())
    }
}

/// Current settings record version.
pub const SETTINGS_VERSION: u32 = 1;

/// All persisted settings, serialized as one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsRecord {
    pub version: u32,
    pub filter: FilterConfig,
}

impl SettingsRecord {
    pub fn new(filter: FilterConfig) -> Self {
        Self {
            version: SETTINGS_VERSION,
            filter,
        }
    }
}

/// Read a key, treating backend failures as absent.
fn read(store: &dyn KeyValueStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read persisted value");
            None
        }
    }
}

/// Load the filter configuration: versioned record, then legacy keys, then defaults.
pub fn load_filter_config(store: &dyn KeyValueStore) -> FilterConfig {
    if let Some(raw) = read(store, SETTINGS_KEY) {
        match serde_json::from_str::<SettingsRecord>(&raw) {
            Ok(record) if record.version == SETTINGS_VERSION => return record.filter,
            Ok(record) => {
                tracing::warn!(version = record.version, "unsupported settings version, using defaults");
                return FilterConfig::default();
            }
            Err(e) => {
                tracing::warn!(error = %e, "corrupt settings record, using defaults");
                return FilterConfig::default();
            }
        }
    }

    load_legacy_filter_config(store).unwrap_or_default()
}

/// Build a configuration from flat legacy keys, if any are present.
fn load_legacy_filter_config(store: &dyn KeyValueStore) -> Option<FilterConfig> {
    let range_enabled = read(store, legacy::RANGE_ENABLED);
    let range_start = read(store, legacy::RANGE_START);
    let range_end = read(store, legacy::RANGE_END);
    let random_jump = read(store, legacy::RANDOM_JUMP_ENABLED);

    if range_enabled.is_none() && range_start.is_none() && range_end.is_none() && random_jump.is_none() {
        return None;
    }

    let config = FilterConfig {
        range_enabled: range_enabled.as_deref() == Some("true"),
        range_start: range_start
            .as_deref()
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(1),
        range_end: range_end.as_deref().and_then(|s| s.trim().parse::<u32>().ok()),
        random_jump_enabled: random_jump.as_deref() == Some("true"),
        ..FilterConfig::default()
    };

    tracing::info!("migrated legacy range settings");
    Some(config)
}

/// Persist the filter configuration as a versioned record and drop legacy keys.
pub fn save_filter_config(store: &dyn KeyValueStore, config: &FilterConfig) -> Result<(), StoreError> {
    let record = SettingsRecord::new(config.clone());
    store.set(SETTINGS_KEY, &serde_json::to_string(&record)?)?;
    for key in legacy::ALL {
        store.remove(key)?;
    }
    Ok(())
}

/// Load the saved current index; missing or corrupt values yield `None`.
pub fn load_current_index(store: &dyn KeyValueStore) -> Option<usize> {
    let raw = read(store, CURRENT_INDEX_KEY)?;
    match raw.trim().parse::<usize>() {
        Ok(index) => Some(index),
        Err(_) => {
            tracing::warn!(value = %raw, "corrupt current index, ignoring");
            None
        }
    }
}

pub fn save_current_index(store: &dyn KeyValueStore, index: usize) -> Result<(), StoreError> {
    store.set(CURRENT_INDEX_KEY, &index.to_string())
}
