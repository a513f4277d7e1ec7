//! Execution of query plans and prepared value sets.
//!
//! The `Executor` trait is the seam to a store. `MemoryStore` implements it over in-memory
//! tables and is what the server runs with.

pub mod comparison;
pub mod error;
pub mod executor;
pub mod id_generators;
pub mod memory;
pub mod metrics;

pub use error::Error;
pub use executor::{Executor, Row};
pub use memory::MemoryStore;
