//! Sensor-switch controller: persisted switch with a delayed sensor.
//!
//! Turning the switch on persists the switch at once and schedules the sensor
//! to follow after the configured delay. Turning it off schedules the sensor
//! with no delay. Every new switch value cancels the transition still
//! pending, so the latest request always wins. Requests are serialized per
//! accessory and every transition carries a generation number: a transition
//! that was replaced while already running never writes the sensor.
//!
//! Writing the switch to the value it already holds is a no-op: nothing is
//! persisted and the pending transition keeps running. The transition itself
//! always writes the sensor and notifies the host when it fires.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use dummysensor_domain::accessory::{AccessoryConfig, StateKeys};
use dummysensor_domain::characteristic::{Characteristic, CharacteristicValue, ServiceType};
use dummysensor_domain::error::DummySensorError;
use dummysensor_domain::event::HostEvent;
use dummysensor_domain::sensor::{SensorKind, SensorReading};

use crate::ports::{AccessoryService, HostNotifier, StateStore};

/// Switch/sensor pair of one accessory.
pub struct SensorSwitch<S, N> {
    name: String,
    kind: SensorKind,
    delay: Duration,
    keys: StateKeys,
    store: Arc<S>,
    notifier: Arc<N>,
    pending: Arc<Mutex<Pending>>,
}

/// The single scheduled transition of an accessory.
#[derive(Default)]
struct Pending {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl Pending {
    /// Invalidate the scheduled transition and return the next generation.
    fn invalidate(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.generation
    }
}

impl<S, N> SensorSwitch<S, N>
where
    S: StateStore + 'static,
    N: HostNotifier + 'static,
{
    /// Create the controller and announce the persisted switch value to the
    /// host.
    pub fn new(
        name: impl Into<String>,
        kind: SensorKind,
        delay: Duration,
        store: Arc<S>,
        notifier: Arc<N>,
    ) -> Self {
        let name = name.into();
        let keys = StateKeys::for_name(&name);
        let controller = Self {
            name,
            kind,
            delay,
            keys,
            store,
            notifier,
            pending: Arc::default(),
        };

        let switch_on = controller.switch_on();
        tracing::debug!(
            accessory = %controller.name,
            kind = %controller.kind,
            switch_on,
            sensor_on = controller.sensor_on(),
            "accessory state loaded"
        );
        controller.notifier.notify(HostEvent::characteristic_changed(
            &controller.name,
            ServiceType::Switch,
            Characteristic::On,
            CharacteristicValue::Bool(switch_on),
        ));

        controller
    }

    /// Build a controller from host configuration.
    ///
    /// An unknown sensor kind falls back to contact.
    ///
    /// # Errors
    ///
    /// Returns [`DummySensorError::Validation`] when the configuration is
    /// invalid.
    pub fn from_config(
        config: &AccessoryConfig,
        store: Arc<S>,
        notifier: Arc<N>,
    ) -> Result<Self, DummySensorError> {
        config.validate()?;
        let kind = config.sensor_kind().unwrap_or_else(|err| {
            tracing::warn!(accessory = %config.name, %err, "falling back to contact sensor");
            SensorKind::Contact
        });
        Ok(Self::new(
            config.name.clone(),
            kind,
            config.delay(),
            store,
            notifier,
        ))
    }

    /// Configured on-delay.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether a sensor transition is scheduled and has not fired yet.
    #[must_use]
    pub fn has_pending_transition(&self) -> bool {
        lock(&self.pending)
            .handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn switch_on(&self) -> bool {
        read_flag(&*self.store, &self.keys.switch)
    }

    fn sensor_on(&self) -> bool {
        read_flag(&*self.store, &self.keys.sensor)
    }

    /// Replace any pending transition with one that moves the sensor to
    /// `value` once `delay` has elapsed.
    fn reschedule(&self, pending: &mut Pending, value: bool, delay: Duration) {
        let transition = Transition {
            name: self.name.clone(),
            kind: self.kind,
            key: self.keys.sensor.clone(),
            value,
            delay,
            generation: pending.invalidate(),
        };
        let slot = Arc::clone(&self.pending);
        let store = Arc::clone(&self.store);
        let notifier = Arc::clone(&self.notifier);

        pending.handle = Some(tokio::spawn(async move {
            if !transition.delay.is_zero() {
                tokio::time::sleep(transition.delay).await;
            }
            let current = lock(&slot);
            if current.generation != transition.generation {
                tracing::trace!(accessory = %transition.name, "sensor transition superseded");
                return;
            }
            transition.commit(&*store, &*notifier);
        }));
    }
}

fn lock(pending: &Mutex<Pending>) -> MutexGuard<'_, Pending> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<S, N> AccessoryService for SensorSwitch<S, N>
where
    S: StateStore + 'static,
    N: HostNotifier + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn sensor_kind(&self) -> SensorKind {
        self.kind
    }

    fn get_switch(&self) -> bool {
        self.switch_on()
    }

    fn set_switch(&self, on: bool) -> Result<(), DummySensorError> {
        let mut pending = lock(&self.pending);
        if self.switch_on() == on {
            tracing::trace!(accessory = %self.name, on, "switch already in requested state");
            return Ok(());
        }

        self.store.set_bool(&self.keys.switch, on)?;

        let delay = if on { self.delay } else { Duration::ZERO };
        self.reschedule(&mut pending, on, delay);
        Ok(())
    }

    fn get_sensor_reading(&self) -> SensorReading {
        self.kind.reading(self.sensor_on())
    }

    fn cancel_pending(&self) {
        let mut pending = lock(&self.pending);
        if pending.handle.is_some() {
            pending.invalidate();
            tracing::debug!(accessory = %self.name, "pending sensor transition cancelled");
        }
    }
}

/// A scheduled sensor write.
struct Transition {
    name: String,
    kind: SensorKind,
    key: String,
    value: bool,
    delay: Duration,
    generation: u64,
}

impl Transition {
    /// Persist and announce the new sensor value. Called with the pending
    /// slot locked.
    fn commit<S: StateStore, N: HostNotifier>(self, store: &S, notifier: &N) {
        tracing::debug!(
            accessory = %self.name,
            delay = ?self.delay,
            sensor_on = self.value,
            "sensor changed after delay"
        );

        if let Err(err) = store.set_bool(&self.key, self.value) {
            tracing::error!(
                accessory = %self.name,
                error = %err,
                "failed to persist sensor state"
            );
            return;
        }

        let reading = self.kind.reading(self.value);
        notifier.notify(HostEvent::characteristic_changed(
            &self.name,
            self.kind.service(),
            self.kind.characteristic(),
            reading.value(),
        ));
    }
}

/// Read a persisted flag; absent or unreadable values are `false`.
fn read_flag<S: StateStore + ?Sized>(store: &S, key: &str) -> bool {
    match store.get_bool(key) {
        Ok(value) => value.unwrap_or(false),
        Err(err) => {
            tracing::warn!(key, error = %err, "failed to read state, assuming off");
            false
        }
    }
}
