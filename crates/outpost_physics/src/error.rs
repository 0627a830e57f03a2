//! Error types for the collision system

use outpost_core::ObjectId;
use thiserror::Error;

/// Collision system errors
#[derive(Debug, Error)]
pub enum PhysicsError {
    /// An object with this id is already registered
    #[error("Object already registered: {0}")]
    DuplicateObject(ObjectId),

    /// Object not found
    #[error("Object not found: {0}")]
    ObjectNotFound(ObjectId),

    /// Shape with non-finite or non-positive dimensions
    #[error("Invalid collision shape for {id}: {reason}")]
    InvalidShape { id: ObjectId, reason: String },

    /// Invalid configuration
    #[error("Invalid collision configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for collision operations
pub type Result<T> = std::result::Result<T, PhysicsError>;
