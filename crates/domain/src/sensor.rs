//! Sensor kinds and the readings they report to the host.
//!
//! | kind | characteristic | sensor on | sensor off |
//! |------|----------------|-----------|------------|
//! | contact | `ContactSensorState` | `CONTACT_NOT_DETECTED` | `CONTACT_DETECTED` |
//! | leak | `LeakDetected` | `LEAK_DETECTED` | `LEAK_NOT_DETECTED` |
//! | occupancy | `OccupancyDetected` | `OCCUPANCY_DETECTED` | `OCCUPANCY_NOT_DETECTED` |
//! | motion | `MotionDetected` | `true` | `false` |
//!
//! Contact sensors are inverted: an "on" sensor means the contact is open,
//! which the host reports as "not detected".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::characteristic::{Characteristic, CharacteristicValue, ServiceType};

/// Which kind of sensor an accessory emulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    #[default]
    Contact,
    Leak,
    Occupancy,
    Motion,
}

impl SensorKind {
    /// Service the sensor is exposed through.
    #[must_use]
    pub fn service(self) -> ServiceType {
        match self {
            Self::Contact => ServiceType::ContactSensor,
            Self::Leak => ServiceType::LeakSensor,
            Self::Occupancy => ServiceType::OccupancySensor,
            Self::Motion => ServiceType::MotionSensor,
        }
    }

    /// Characteristic carrying the detection state.
    #[must_use]
    pub fn characteristic(self) -> Characteristic {
        match self {
            Self::Contact => Characteristic::ContactSensorState,
            Self::Leak => Characteristic::LeakDetected,
            Self::Occupancy => Characteristic::OccupancyDetected,
            Self::Motion => Characteristic::MotionDetected,
        }
    }

    /// Translate the persisted sensor boolean into this kind's reading.
    #[must_use]
    pub fn reading(self, sensor_on: bool) -> SensorReading {
        match self {
            Self::Contact => SensorReading::Contact(if sensor_on {
                ContactSensorState::NotDetected
            } else {
                ContactSensorState::Detected
            }),
            Self::Leak => SensorReading::Leak(if sensor_on {
                LeakDetected::Detected
            } else {
                LeakDetected::NotDetected
            }),
            Self::Occupancy => SensorReading::Occupancy(if sensor_on {
                OccupancyDetected::Detected
            } else {
                OccupancyDetected::NotDetected
            }),
            Self::Motion => SensorReading::Motion(sensor_on),
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contact => f.write_str("contact"),
            Self::Leak => f.write_str("leak"),
            Self::Occupancy => f.write_str("occupancy"),
            Self::Motion => f.write_str("motion"),
        }
    }
}

/// Returned when a sensor kind string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sensor kind {0:?}")]
pub struct UnknownSensorKind(pub String);

impl FromStr for SensorKind {
    type Err = UnknownSensorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contact" => Ok(Self::Contact),
            "leak" => Ok(Self::Leak),
            "occupancy" => Ok(Self::Occupancy),
            "motion" => Ok(Self::Motion),
            other => Err(UnknownSensorKind(other.to_string())),
        }
    }
}

/// `ContactSensorState` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ContactSensorState {
    Detected = 0,
    NotDetected = 1,
}

/// `LeakDetected` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LeakDetected {
    NotDetected = 0,
    Detected = 1,
}

/// `OccupancyDetected` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OccupancyDetected {
    NotDetected = 0,
    Detected = 1,
}

/// Detection state reported for a sensor, in its kind-specific encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorReading {
    Contact(ContactSensorState),
    Leak(LeakDetected),
    Occupancy(OccupancyDetected),
    Motion(bool),
}

impl SensorReading {
    /// Kind this reading belongs to.
    #[must_use]
    pub fn kind(self) -> SensorKind {
        match self {
            Self::Contact(_) => SensorKind::Contact,
            Self::Leak(_) => SensorKind::Leak,
            Self::Occupancy(_) => SensorKind::Occupancy,
            Self::Motion(_) => SensorKind::Motion,
        }
    }

    /// Host constant name for this reading.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Contact(ContactSensorState::Detected) => "CONTACT_DETECTED",
            Self::Contact(ContactSensorState::NotDetected) => "CONTACT_NOT_DETECTED",
            Self::Leak(LeakDetected::Detected) => "LEAK_DETECTED",
            Self::Leak(LeakDetected::NotDetected) => "LEAK_NOT_DETECTED",
            Self::Occupancy(OccupancyDetected::Detected) => "OCCUPANCY_DETECTED",
            Self::Occupancy(OccupancyDetected::NotDetected) => "OCCUPANCY_NOT_DETECTED",
            Self::Motion(true) => "true",
            Self::Motion(false) => "false",
        }
    }

    /// Wire value sent to the host for this reading.
    #[must_use]
    pub fn value(self) -> CharacteristicValue {
        match self {
            Self::Contact(state) => CharacteristicValue::UInt8(state as u8),
            Self::Leak(state) => CharacteristicValue::UInt8(state as u8),
            Self::Occupancy(state) => CharacteristicValue::UInt8(state as u8),
            Self::Motion(detected) => CharacteristicValue::Bool(detected),
        }
    }
}

impl fmt::Display for SensorReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
