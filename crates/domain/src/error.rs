//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`DummySensorError`] via `#[from]` at the port boundary.

use crate::characteristic::Characteristic;

/// Base error for every fallible operation exposed by the workspace.
#[derive(Debug, thiserror::Error)]
pub enum DummySensorError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("characteristic error")]
    Characteristic(#[from] CharacteristicError),

    /// A storage adapter failed. The concrete error is boxed so the domain
    /// does not depend on any adapter crate.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Invariant violations detected while building domain values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("accessory name must not be empty")]
    EmptyName,

    #[error("accessory {0:?} is registered twice")]
    DuplicateName(String),
}

/// A lookup that did not match anything.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// A host request that does not fit the accessory's characteristics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CharacteristicError {
    #[error("characteristic {0} is not exposed by this accessory")]
    Unsupported(Characteristic),

    #[error("characteristic {0} is read-only")]
    ReadOnly(Characteristic),

    #[error("characteristic {0} expects a boolean value")]
    InvalidValue(Characteristic),

    #[error("unknown service call {0:?}")]
    UnknownService(String),
}
