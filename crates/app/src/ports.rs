//! Port definitions: traits that adapters implement or call.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod accessory;
pub mod host_notifier;
pub mod state_store;

pub use accessory::AccessoryService;
pub use host_notifier::HostNotifier;
pub use state_store::StateStore;
