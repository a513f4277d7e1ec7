//! Translate incoming requests to query plans and prepared value sets to be run by an executor.

pub mod error;
pub mod helpers;
pub mod mutation;
pub mod query;
