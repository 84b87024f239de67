//! Accessory port: the capability host adapters drive.

use dummysensor_domain::error::DummySensorError;
use dummysensor_domain::sensor::{SensorKind, SensorReading};

/// Switch/sensor pair as seen by a host adapter.
pub trait AccessoryService: Send + Sync {
    /// Configured accessory name.
    fn name(&self) -> &str;

    /// Kind of sensor this accessory emulates.
    fn sensor_kind(&self) -> SensorKind;

    /// Current persisted switch value.
    fn get_switch(&self) -> bool;

    /// Request a new switch value.
    ///
    /// Must be called from within a tokio runtime: the sensor transition is
    /// spawned on it, and calling this elsewhere panics.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the switch value could not be persisted.
    fn set_switch(&self, on: bool) -> Result<(), DummySensorError>;

    /// Current sensor reading, in the kind-specific encoding.
    fn get_sensor_reading(&self) -> SensorReading;

    /// Drop any transition that has not fired yet.
    fn cancel_pending(&self);
}
