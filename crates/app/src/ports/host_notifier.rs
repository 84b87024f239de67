//! Host notifier port: characteristic changes pushed to the host platform.

use dummysensor_domain::event::HostEvent;

/// Receives characteristic changes the host must be told about.
///
/// Notifications are fire-and-forget: the host is not expected to answer,
/// and a host that is not listening simply misses the event.
pub trait HostNotifier: Send + Sync {
    /// Deliver an event to the host.
    fn notify(&self, event: HostEvent);
}

impl<T: HostNotifier + ?Sized> HostNotifier for std::sync::Arc<T> {
    fn notify(&self, event: HostEvent) {
        (**self).notify(event);
    }
}
