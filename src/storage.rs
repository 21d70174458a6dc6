//! Persisted user preferences: the expression source and the theme.
//!
//! Storage is a plain string key/value store. In the browser it is backed by
//! `localStorage` (see [`crate::web::LocalStore`]); elsewhere by
//! [`MemoryStore`]. Persistence is best-effort: a failed write is logged and
//! otherwise ignored so it never blocks an edit.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::consts::{DEFAULT_SOURCE, SOURCE_KEY, THEME_KEY};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The backing store is missing (e.g. `localStorage` disabled).
    #[error("storage unavailable")]
    Unavailable,
    /// The backing store refused the write (quota, privacy mode, ...).
    #[error("storage write failed for key {key}: {message}")]
    WriteFailed { key: String, message: String },
}

/// String key/value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns [`StorageError`] when the value could not be stored.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process store; the default outside the browser.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Page colour theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// The persisted expression source, or the built-in default when absent or empty.
#[must_use]
pub fn load_source(store: &impl KeyValueStore) -> String {
    match store.get(SOURCE_KEY) {
        Some(source) if !source.is_empty() => source,
        _ => DEFAULT_SOURCE.to_owned(),
    }
}

pub fn save_source(store: &mut impl KeyValueStore, source: &str) {
    if let Err(e) = store.set(SOURCE_KEY, source) {
        warn!(error = %e, "failed to persist expression source");
    }
}

/// The persisted theme. Absent means light; any value other than `"light"` means dark.
#[must_use]
pub fn load_theme(store: &impl KeyValueStore) -> Theme {
    match store.get(THEME_KEY) {
        None => Theme::Light,
        Some(value) if value == "light" => Theme::Light,
        Some(_) => Theme::Dark,
    }
}

pub fn save_theme(store: &mut impl KeyValueStore, theme: Theme) {
    if let Err(e) = store.set(THEME_KEY, theme.as_str()) {
        warn!(error = %e, "failed to persist theme");
    }
}
