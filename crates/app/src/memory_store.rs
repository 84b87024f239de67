//! Volatile [`StateStore`] kept in a hash map.
//!
//! State is lost when the process exits. Handy for tests and for running
//! without a persist directory.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use dummysensor_domain::error::DummySensorError;

use crate::ports::StateStore;

/// In-memory key-value store.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    values: Mutex<HashMap<String, bool>>,
}

impl InMemoryStateStore {
    /// Create a store pre-populated with `entries`.
    #[must_use]
    pub fn with<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, bool)>,
        K: Into<String>,
    {
        let values = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self {
            values: Mutex::new(values),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, bool>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StateStore for InMemoryStateStore {
    fn get_bool(&self, key: &str) -> Result<Option<bool>, DummySensorError> {
        Ok(self.lock().get(key).copied())
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), DummySensorError> {
        self.lock().insert(key.to_string(), value);
        Ok(())
    }
}
