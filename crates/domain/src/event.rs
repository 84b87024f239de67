//! Host events: notifications pushed to the host platform.
//!
//! An event is emitted whenever an accessory changes a characteristic on its
//! own (the delayed sensor transition) or announces its initial state.

use serde::{Deserialize, Serialize};

use crate::characteristic::{Characteristic, CharacteristicValue, ServiceType};
use crate::id::{AccessoryId, EventId};
use crate::time::{Timestamp, now};

/// A characteristic of an accessory took a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostEvent {
    pub id: EventId,
    pub accessory_id: AccessoryId,
    pub accessory: String,
    pub service: ServiceType,
    pub characteristic: Characteristic,
    pub value: CharacteristicValue,
    pub timestamp: Timestamp,
}

impl HostEvent {
    /// Create a new event stamped with the current time.
    #[must_use]
    pub fn characteristic_changed(
        accessory: &str,
        service: ServiceType,
        characteristic: Characteristic,
        value: CharacteristicValue,
    ) -> Self {
        Self {
            id: EventId::new(),
            accessory_id: AccessoryId::from_name(accessory),
            accessory: accessory.to_string(),
            service,
            characteristic,
            value,
            timestamp: now(),
        }
    }
}
