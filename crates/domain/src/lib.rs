//! # dummysensor-domain
//!
//! Pure domain model for the dummysensor accessory bridge.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Sensor kinds** (contact, leak, occupancy, motion) and their readings
//! - Define **Characteristics** and **Services** as seen by the host platform
//! - Define **Accessory configuration** and the static accessory information
//! - Define **Host events** (characteristic-change notifications)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod accessory;
pub mod characteristic;
pub mod event;
pub mod sensor;
