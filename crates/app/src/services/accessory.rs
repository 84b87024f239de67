//! Accessory: characteristic and service dispatch for one switch/sensor pair.
//!
//! Host adapters address an accessory by characteristic (`On`,
//! `ContactSensorState`, …) or by service call (`turn_on`, `turn_off`,
//! `toggle`). This layer maps those requests onto an [`AccessoryService`].

use dummysensor_domain::accessory::AccessoryInfo;
use dummysensor_domain::characteristic::{Characteristic, CharacteristicValue, ServiceType};
use dummysensor_domain::error::{CharacteristicError, DummySensorError};
use dummysensor_domain::id::AccessoryId;
use dummysensor_domain::sensor::{SensorKind, SensorReading};

use crate::ports::AccessoryService;

/// A service as advertised to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub service: ServiceType,
    pub characteristics: &'static [Characteristic],
}

/// One accessory exposed to the host bridge.
pub struct Accessory<C> {
    id: AccessoryId,
    info: AccessoryInfo,
    inner: C,
}

impl<C: AccessoryService> Accessory<C> {
    /// Wrap a switch/sensor pair.
    pub fn new(inner: C) -> Self {
        Self {
            id: AccessoryId::from_name(inner.name()),
            info: AccessoryInfo::for_name(inner.name()),
            inner,
        }
    }

    #[must_use]
    pub fn id(&self) -> AccessoryId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    #[must_use]
    pub fn sensor_kind(&self) -> SensorKind {
        self.inner.sensor_kind()
    }

    /// Static accessory information.
    #[must_use]
    pub fn information(&self) -> &AccessoryInfo {
        &self.info
    }

    /// The underlying switch/sensor pair.
    #[must_use]
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Services offered to the host: information, switch and one sensor.
    #[must_use]
    pub fn services(&self) -> Vec<ServiceDescriptor> {
        [
            ServiceType::AccessoryInformation,
            ServiceType::Switch,
            self.sensor_kind().service(),
        ]
        .into_iter()
        .map(|service| ServiceDescriptor {
            service,
            characteristics: service.characteristics(),
        })
        .collect()
    }

    /// Host read of the switch `On` characteristic.
    #[must_use]
    pub fn get_switch(&self) -> bool {
        tracing::debug!(accessory = %self.name(), "triggered GET On");
        self.inner.get_switch()
    }

    /// Host write of the switch `On` characteristic.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the switch value could not be persisted.
    pub fn set_switch(&self, on: bool) -> Result<(), DummySensorError> {
        tracing::debug!(accessory = %self.name(), on, "triggered SET On");
        self.inner.set_switch(on)
    }

    /// Host read of the sensor characteristic.
    #[must_use]
    pub fn get_sensor_reading(&self) -> SensorReading {
        tracing::debug!(
            accessory = %self.name(),
            characteristic = %self.sensor_kind().characteristic(),
            "triggered GET"
        );
        self.inner.get_sensor_reading()
    }

    /// Read any characteristic the accessory exposes.
    ///
    /// # Errors
    ///
    /// Returns [`CharacteristicError::Unsupported`] for characteristics that
    /// belong to another sensor kind.
    pub fn read(
        &self,
        characteristic: Characteristic,
    ) -> Result<CharacteristicValue, DummySensorError> {
        let value = match characteristic {
            Characteristic::Name => CharacteristicValue::String(self.name().to_string()),
            Characteristic::Manufacturer => {
                CharacteristicValue::String(self.info.manufacturer.clone())
            }
            Characteristic::Model => CharacteristicValue::String(self.info.model.clone()),
            Characteristic::FirmwareRevision => {
                CharacteristicValue::String(self.info.firmware_revision.clone())
            }
            Characteristic::SerialNumber => {
                CharacteristicValue::String(self.info.serial_number.clone())
            }
            Characteristic::On => CharacteristicValue::Bool(self.get_switch()),
            other if other == self.sensor_kind().characteristic() => {
                self.get_sensor_reading().value()
            }
            other => return Err(CharacteristicError::Unsupported(other).into()),
        };
        Ok(value)
    }

    /// Write a characteristic. Only `On` accepts writes.
    ///
    /// # Errors
    ///
    /// Returns a [`CharacteristicError`] when the characteristic is read-only,
    /// not exposed, or the value is not a boolean, and a storage error when
    /// the switch could not be persisted.
    pub fn write(
        &self,
        characteristic: Characteristic,
        value: &CharacteristicValue,
    ) -> Result<(), DummySensorError> {
        if !self.exposes(characteristic) {
            return Err(CharacteristicError::Unsupported(characteristic).into());
        }
        if !characteristic.is_writable() {
            return Err(CharacteristicError::ReadOnly(characteristic).into());
        }
        let on = value
            .as_bool()
            .ok_or(CharacteristicError::InvalidValue(characteristic))?;
        self.set_switch(on)
    }

    /// Handle a `turn_on`, `turn_off` or `toggle` service call, returning
    /// the requested switch value.
    ///
    /// # Errors
    ///
    /// Returns [`CharacteristicError::UnknownService`] for any other service,
    /// or a storage error when the switch could not be persisted.
    pub fn handle_service_call(&self, service: &str) -> Result<bool, DummySensorError> {
        let on = match service {
            "turn_on" => true,
            "turn_off" => false,
            "toggle" => !self.inner.get_switch(),
            other => return Err(CharacteristicError::UnknownService(other.to_string()).into()),
        };
        self.set_switch(on)?;
        Ok(on)
    }

    /// Drop any sensor transition that has not fired yet.
    pub fn cancel_pending(&self) {
        self.inner.cancel_pending();
    }

    fn exposes(&self, characteristic: Characteristic) -> bool {
        self.services()
            .iter()
            .any(|descriptor| descriptor.characteristics.contains(&characteristic))
    }
}
