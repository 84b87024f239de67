//! # dummysensor-adapter-storage-file
//!
//! Durable key-value store keeping one JSON file per key in a directory.
//!
//! ## Responsibilities
//! - Implement the `StateStore` port defined in `dummysensor-app::ports`
//! - Create the persist directory on startup
//! - Write records atomically (temp file, fsync, rename)
//! - Optionally tolerate corrupted records by treating them as absent
//!
//! ## Dependency rule
//! Depends on `dummysensor-app` (for port traits) and `dummysensor-domain`
//! (for domain types). The `app` and `domain` crates must never reference
//! this adapter.

mod error;
mod store;

pub use error::FileStoreError;
pub use store::{Config, FileStateStore};
