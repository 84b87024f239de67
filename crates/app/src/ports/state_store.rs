//! State store port: durable key-value persistence.
//!
//! Each accessory owns two keys (`<name>-switch`, `<name>-sensor`), so
//! accessories never contend for the same entry.

use dummysensor_domain::error::DummySensorError;

/// Synchronous durable store of boolean values.
///
/// A write must be durable by the time [`set_bool`](Self::set_bool) returns.
pub trait StateStore: Send + Sync {
    /// Read the value stored under `key`, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`DummySensorError::Storage`] if the backend cannot be read.
    fn get_bool(&self, key: &str) -> Result<Option<bool>, DummySensorError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`DummySensorError::Storage`] if the write fails.
    fn set_bool(&self, key: &str, value: bool) -> Result<(), DummySensorError>;
}

impl<T: StateStore + ?Sized> StateStore for std::sync::Arc<T> {
    fn get_bool(&self, key: &str) -> Result<Option<bool>, DummySensorError> {
        (**self).get_bool(key)
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), DummySensorError> {
        (**self).set_bool(key, value)
    }
}
