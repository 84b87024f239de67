//! # dummysensor-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `StateStore`: durable key-value persistence of the two booleans
//!   - `HostNotifier`: characteristic-change notifications to the host
//! - Define the **driving/inbound port** `AccessoryService` that host adapters call
//! - Implement the use-cases:
//!   - `SensorSwitch`: persisted switch plus delayed sensor transition
//!   - `Accessory`: characteristic/service dispatch for one accessory
//!   - `AccessoryRegistry`: every configured accessory, keyed by id
//! - Provide **in-process infrastructure** (notifier, memory store) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `dummysensor-domain` only (plus `tokio` for timers and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod memory_store;
pub mod notifier;
pub mod ports;
pub mod services;
