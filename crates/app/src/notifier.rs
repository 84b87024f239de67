//! In-process host notifier backed by a tokio broadcast channel.

use tokio::sync::broadcast;

use dummysensor_domain::event::HostEvent;

use crate::ports::HostNotifier;

/// Fans host events out to every subscribed host adapter.
///
/// Notifying succeeds even when nobody is subscribed
/// (the event is simply dropped).
pub struct InProcessNotifier {
    sender: broadcast::Sender<HostEvent>,
}

impl InProcessNotifier {
    /// Create a new notifier with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to host events.
    ///
    /// Returns a receiver that will get all events emitted *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<HostEvent> {
        self.sender.subscribe()
    }
}

impl HostNotifier for InProcessNotifier {
    fn notify(&self, event: HostEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("host event dropped, no subscriber");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use dummysensor_domain::characteristic::{Characteristic, CharacteristicValue, ServiceType};
    use dummysensor_domain::sensor::SensorKind;

    use super::*;
    use crate::memory_store::InMemoryStateStore;
    use crate::ports::AccessoryService;
    use crate::services::sensor_switch::SensorSwitch;

    fn leak_event(name: &str, detected: bool) -> HostEvent {
        HostEvent::characteristic_changed(
            name,
            ServiceType::LeakSensor,
            Characteristic::LeakDetected,
            CharacteristicValue::UInt8(u8::from(detected)),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn should_carry_announcement_then_sensor_change() {
        let notifier = Arc::new(InProcessNotifier::new(8));
        let mut rx = notifier.subscribe();
        let controller = SensorSwitch::new(
            "Basement",
            SensorKind::Leak,
            Duration::from_millis(200),
            Arc::new(InMemoryStateStore::default()),
            Arc::clone(&notifier),
        );

        let announced = rx.recv().await.unwrap();
        assert_eq!(announced.accessory, "Basement");
        assert_eq!(announced.service, ServiceType::Switch);
        assert_eq!(announced.value, CharacteristicValue::Bool(false));

        controller.set_switch(true).unwrap();
        tokio::time::advance(Duration::from_millis(200)).await;

        let changed = rx.recv().await.unwrap();
        assert_eq!(changed.accessory_id, announced.accessory_id);
        assert_eq!(changed.service, ServiceType::LeakSensor);
        assert_eq!(changed.characteristic, Characteristic::LeakDetected);
        assert_eq!(changed.value, CharacteristicValue::UInt8(1));
    }

    #[tokio::test]
    async fn should_keep_order_across_accessories() {
        let notifier = InProcessNotifier::new(8);
        let mut console = notifier.subscribe();
        let mut bridge = notifier.subscribe();

        notifier.notify(leak_event("Basement", true));
        notifier.notify(leak_event("Laundry", true));
        notifier.notify(leak_event("Basement", false));

        for rx in [&mut console, &mut bridge] {
            let seen: Vec<_> = [
                rx.recv().await.unwrap(),
                rx.recv().await.unwrap(),
                rx.recv().await.unwrap(),
            ]
            .into_iter()
            .map(|event| (event.accessory, event.value))
            .collect();
            assert_eq!(
                seen,
                [
                    ("Basement".to_string(), CharacteristicValue::UInt8(1)),
                    ("Laundry".to_string(), CharacteristicValue::UInt8(1)),
                    ("Basement".to_string(), CharacteristicValue::UInt8(0)),
                ]
            );
        }
    }

    #[test]
    fn should_drop_events_while_no_host_listens() {
        let notifier = InProcessNotifier::new(4);
        notifier.notify(leak_event("Basement", true));

        let mut rx = notifier.subscribe();
        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn should_report_lag_to_slow_host() {
        let notifier = InProcessNotifier::new(2);
        let mut rx = notifier.subscribe();
        for detected in [true, false, true] {
            notifier.notify(leak_event("Basement", detected));
        }

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(1))
        ));
        assert_eq!(rx.recv().await.unwrap().value, CharacteristicValue::UInt8(0));
        assert_eq!(rx.recv().await.unwrap().value, CharacteristicValue::UInt8(1));
    }
}
