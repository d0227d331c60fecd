//! Persistent key-value collaborator seam.
//!
//! The actual store (whatever the host provides) is out of scope. The
//! contract that matters: all operations are asynchronous and every one is
//! independently failure-tolerant — a storage failure is logged and the
//! surrounding flow continues without persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use verdict_core::ScoreResult;

/// Storage key for the product extracted from the current page.
pub const KEY_CURRENT_PRODUCT: &str = "current_product";
/// Storage key for the most recent analysis, wrapped in [`StoredAnalysis`].
pub const KEY_CURRENT_ANALYSIS: &str = "current_analysis";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Asynchronous key-value store collaborator.
pub trait KeyValueStore {
    /// Reads one key.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backing store is unreachable.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<serde_json::Value>, StorageError>>;

    /// Writes one key.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backing store is unreachable.
    fn set(
        &self,
        key: &str,
        value: serde_json::Value,
    ) -> impl std::future::Future<Output = Result<(), StorageError>>;

    /// Removes the given keys. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backing store is unreachable.
    fn remove(
        &self,
        keys: &[&str],
    ) -> impl std::future::Future<Output = Result<(), StorageError>>;
}

/// An analysis persisted with the moment it was stored, so readers can
/// apply the same freshness window the in-memory cache uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredAnalysis {
    pub result: ScoreResult,
    pub stored_at: DateTime<Utc>,
}

impl StoredAnalysis {
    #[must_use]
    pub fn new(result: ScoreResult) -> Self {
        Self {
            result,
            stored_at: Utc::now(),
        }
    }

    /// `true` while the entry is younger than `ttl_secs`.
    #[must_use]
    pub fn is_fresh(&self, ttl_secs: u64, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(self.stored_at);
        age.num_seconds() >= 0 && age.num_seconds() < i64::try_from(ttl_secs).unwrap_or(i64::MAX)
    }
}

/// Reads the persisted analysis and returns it only while fresh.
///
/// Any storage failure or malformed payload is treated as a miss — the
/// panel falls through to a live request either way.
pub async fn load_fresh_analysis<S: KeyValueStore>(
    store: &S,
    ttl_secs: u64,
) -> Option<ScoreResult> {
    let value = match store.get(KEY_CURRENT_ANALYSIS).await {
        Ok(Some(value)) => value,
        Ok(None) => return None,
        Err(err) => {
            tracing::warn!(error = %err, "could not read persisted analysis");
            return None;
        }
    };

    match serde_json::from_value::<StoredAnalysis>(value) {
        Ok(stored) if stored.is_fresh(ttl_secs, Utc::now()) => Some(stored.result),
        Ok(_) => None,
        Err(err) => {
            tracing::warn!(error = %err, "persisted analysis payload is malformed");
            None
        }
    }
}

/// In-process store used by tests and the CLI. Clones share the same
/// underlying map, standing in for the two contexts sharing one host store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    entries: std::sync::Arc<std::sync::Mutex<std::collections::HashMap<String, serde_json::Value>>>,
}

impl InMemoryStore {
    fn lock(
        &self,
    ) -> Result<
        std::sync::MutexGuard<'_, std::collections::HashMap<String, serde_json::Value>>,
        StorageError,
    > {
        self.entries.lock().map_err(|_| StorageError::Unavailable {
            reason: "store mutex poisoned".to_owned(),
        })
    }
}

impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut entries = self.lock()?;
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }
}
