//! Errors for execution.

use thiserror::Error;

/// Execution errors. They are propagated to the caller unmodified.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("A record of entity '{entity}' with key {key} already exists.")]
    DuplicateKey { entity: String, key: String },
    #[error("Entity '{0}' not found.")]
    EntityNotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
