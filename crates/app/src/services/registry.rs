//! Accessory registry: every configured accessory, keyed by id.

use std::collections::HashMap;

use dummysensor_domain::error::{DummySensorError, NotFoundError, ValidationError};
use dummysensor_domain::id::AccessoryId;

use crate::ports::AccessoryService;
use crate::services::accessory::Accessory;

/// Owns the accessories exposed to the host.
pub struct AccessoryRegistry<C> {
    accessories: HashMap<AccessoryId, Accessory<C>>,
}

impl<C> Default for AccessoryRegistry<C> {
    fn default() -> Self {
        Self {
            accessories: HashMap::new(),
        }
    }
}

impl<C: AccessoryService> AccessoryRegistry<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an accessory.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateName`] if an accessory with the
    /// same name is already registered.
    #[tracing::instrument(skip(self, accessory), fields(accessory = %accessory.name()))]
    pub fn register(&mut self, accessory: Accessory<C>) -> Result<AccessoryId, DummySensorError> {
        let id = accessory.id();
        if self.accessories.contains_key(&id) {
            return Err(ValidationError::DuplicateName(accessory.name().to_string()).into());
        }
        tracing::info!(
            %id,
            kind = %accessory.sensor_kind(),
            serial = %accessory.information().serial_number,
            "accessory registered"
        );
        self.accessories.insert(id, accessory);
        Ok(id)
    }

    /// Look an accessory up by id.
    ///
    /// # Errors
    ///
    /// Returns [`DummySensorError::NotFound`] when no accessory has this id.
    pub fn get(&self, id: AccessoryId) -> Result<&Accessory<C>, DummySensorError> {
        self.accessories.get(&id).ok_or_else(|| {
            NotFoundError {
                entity: "Accessory",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Look an accessory up by its configured name.
    ///
    /// # Errors
    ///
    /// Returns [`DummySensorError::NotFound`] when no accessory has this name.
    pub fn find_by_name(&self, name: &str) -> Result<&Accessory<C>, DummySensorError> {
        self.accessories
            .get(&AccessoryId::from_name(name))
            .ok_or_else(|| {
                NotFoundError {
                    entity: "Accessory",
                    id: name.to_string(),
                }
                .into()
            })
    }

    /// All accessories, sorted by name.
    #[must_use]
    pub fn accessories(&self) -> Vec<&Accessory<C>> {
        let mut all: Vec<_> = self.accessories.values().collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        all
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accessories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accessories.is_empty()
    }

    /// Cancel every pending sensor transition.
    #[tracing::instrument(skip(self))]
    pub fn shutdown(&self) {
        for accessory in self.accessories.values() {
            accessory.cancel_pending();
        }
        tracing::info!(count = self.accessories.len(), "accessories stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use dummysensor_domain::sensor::SensorKind;

    use crate::memory_store::InMemoryStateStore;
    use crate::notifier::InProcessNotifier;
    use crate::ports::StateStore;
    use crate::services::sensor_switch::SensorSwitch;

    type Controller = SensorSwitch<InMemoryStateStore, InProcessNotifier>;

    fn accessory(
        name: &str,
        kind: SensorKind,
        store: &Arc<InMemoryStateStore>,
    ) -> Accessory<Controller> {
        Accessory::new(SensorSwitch::new(
            name,
            kind,
            Duration::from_millis(1000),
            Arc::clone(store),
            Arc::new(InProcessNotifier::new(8)),
        ))
    }

    #[tokio::test]
    async fn should_register_and_find_by_name() {
        let store = Arc::new(InMemoryStateStore::default());
        let mut registry = AccessoryRegistry::new();
        let id = registry
            .register(accessory("Door", SensorKind::Contact, &store))
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(id).unwrap().name(), "Door");
        assert_eq!(registry.find_by_name("Door").unwrap().id(), id);
    }

    #[tokio::test]
    async fn should_reject_duplicate_names() {
        let store = Arc::new(InMemoryStateStore::default());
        let mut registry = AccessoryRegistry::new();
        registry
            .register(accessory("Door", SensorKind::Contact, &store))
            .unwrap();

        let result = registry.register(accessory("Door", SensorKind::Leak, &store));
        assert!(matches!(
            result,
            Err(DummySensorError::Validation(ValidationError::DuplicateName(_)))
        ));
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_name() {
        let registry: AccessoryRegistry<Controller> = AccessoryRegistry::new();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.find_by_name("Window"),
            Err(DummySensorError::NotFound(_))
        ));
        assert!(matches!(
            registry.get(AccessoryId::from_name("Window")),
            Err(DummySensorError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn should_list_accessories_sorted_by_name() {
        let store = Arc::new(InMemoryStateStore::default());
        let mut registry = AccessoryRegistry::new();
        for name in ["Window", "Basement", "Door"] {
            registry
                .register(accessory(name, SensorKind::Motion, &store))
                .unwrap();
        }
        let names: Vec<_> = registry.accessories().iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["Basement", "Door", "Window"]);
    }

    #[tokio::test(start_paused = true)]
    async fn should_cancel_pending_transitions_on_shutdown() {
        let store = Arc::new(InMemoryStateStore::default());
        let mut registry = AccessoryRegistry::new();
        registry
            .register(accessory("Door", SensorKind::Contact, &store))
            .unwrap();

        registry.find_by_name("Door").unwrap().set_switch(true).unwrap();
        assert!(registry.find_by_name("Door").unwrap().inner().has_pending_transition());

        registry.shutdown();
        tokio::time::advance(Duration::from_millis(2000)).await;
        tokio::task::yield_now().await;

        assert_eq!(store.get_bool("Door-sensor").unwrap(), None);
        assert_eq!(store.get_bool("Door-switch").unwrap(), Some(true));
    }
}
