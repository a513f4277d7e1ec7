//! An HTTP server exposing the entities of a configuration as REST resources.
//!
//! Query strings and request bodies are translated into plans and prepared values by
//! `query-engine-translation`, and run by an executor from `query-engine-execution`.

pub mod error;
pub mod extract;
pub mod mutation;
pub mod query;
pub mod query_params;
pub mod routes;
pub mod state;
