//! Errors for request translation.

use thiserror::Error;

use super::mutation::id_generator::IdGenerationError;

/// A type for translation errors.
///
/// Malformed filter input never ends up here: unknown fields, associations and unparsable
/// literals are dropped or coerced while compiling. These are routing and collaborator errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Entity '{0}' not found.")]
    EntityNotFound(String),
    #[error("No primary key value supplied for entity '{0}'.")]
    MissingPrimaryKey(String),
    #[error("Unable to generate identifiers: {0}")]
    IdentifierGeneration(#[from] IdGenerationError),
    #[error("{0} is not supported.")]
    NotSupported(String),
}
