//! Errors that can be thrown when processing configuration.

use std::path::PathBuf;

use thiserror::Error;

/// The errors that can be thrown when parsing a configuration directory.
#[derive(Debug, Error)]
pub enum ParseConfigurationError {
    #[error("parse error on {file_path}:{line}:{column}: {message}")]
    ParseError {
        file_path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },
    #[error("unsupported configuration version {version} in {file_path}")]
    UnsupportedVersion { file_path: PathBuf, version: u32 },
    #[error("I/O error: {0}")]
    IoErrorButStringified(String),
}

/// The errors that can be thrown when writing a configuration directory.
#[derive(Debug, Error)]
pub enum WriteParsedConfigurationError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// The errors that can be thrown when validating a parsed configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MakeRuntimeConfigurationError {
    #[error("entity '{entity}' has no primary key: flag a field with primaryKey or declare 'id'")]
    MissingPrimaryKey { entity: String },
    #[error("entity '{entity}' has more than one primary key: {fields:?}")]
    DuplicatePrimaryKey { entity: String, fields: Vec<String> },
    #[error("association '{association}' of entity '{entity}' refers to unknown entity '{target}'")]
    UnknownAssociationTarget {
        entity: String,
        association: String,
        target: String,
    },
    #[error(
        "association '{association}' of entity '{entity}' joins on unknown field '{key}' of entity '{target}'"
    )]
    UnknownKeyField {
        entity: String,
        association: String,
        target: String,
        key: String,
    },
    #[error("entities '{first}' and '{second}' are both served under path '{path}'")]
    DuplicatePath {
        path: String,
        first: String,
        second: String,
    },
}
