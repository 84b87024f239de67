//! Characteristics and services: the host platform's view of an accessory.
//!
//! A characteristic is a single readable (and sometimes writable) attribute;
//! a service bundles the characteristics of one function of the accessory.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Attribute exposed to the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Characteristic {
    Name,
    Manufacturer,
    Model,
    FirmwareRevision,
    SerialNumber,
    On,
    ContactSensorState,
    LeakDetected,
    OccupancyDetected,
    MotionDetected,
}

impl Characteristic {
    /// Whether the host is allowed to write this characteristic.
    #[must_use]
    pub fn is_writable(self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Name => "Name",
            Self::Manufacturer => "Manufacturer",
            Self::Model => "Model",
            Self::FirmwareRevision => "FirmwareRevision",
            Self::SerialNumber => "SerialNumber",
            Self::On => "On",
            Self::ContactSensorState => "ContactSensorState",
            Self::LeakDetected => "LeakDetected",
            Self::OccupancyDetected => "OccupancyDetected",
            Self::MotionDetected => "MotionDetected",
        };
        f.write_str(name)
    }
}

/// Value carried by a characteristic on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacteristicValue {
    Bool(bool),
    UInt8(u8),
    String(String),
}

impl CharacteristicValue {
    /// Borrow the boolean payload, if this is a boolean value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<bool> for CharacteristicValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl fmt::Display for CharacteristicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => value.fmt(f),
            Self::UInt8(value) => value.fmt(f),
            Self::String(value) => f.write_str(value),
        }
    }
}

/// Service bundle offered by an accessory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    AccessoryInformation,
    Switch,
    ContactSensor,
    LeakSensor,
    OccupancySensor,
    MotionSensor,
}

impl ServiceType {
    /// Characteristics bundled by this service, in host order.
    #[must_use]
    pub fn characteristics(self) -> &'static [Characteristic] {
        match self {
            Self::AccessoryInformation => &[
                Characteristic::Manufacturer,
                Characteristic::Model,
                Characteristic::FirmwareRevision,
                Characteristic::SerialNumber,
            ],
            Self::Switch => &[Characteristic::Name, Characteristic::On],
            Self::ContactSensor => &[Characteristic::Name, Characteristic::ContactSensorState],
            Self::LeakSensor => &[Characteristic::Name, Characteristic::LeakDetected],
            Self::OccupancySensor => &[Characteristic::Name, Characteristic::OccupancyDetected],
            Self::MotionSensor => &[Characteristic::Name, Characteristic::MotionDetected],
        }
    }
}
