//! Metadata information regarding the tracked entities and their associations.

pub mod database;

// re-export without modules
pub use database::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Metadata information.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct Metadata {
    pub entities: EntitiesInfo,
}

impl Metadata {
    pub fn empty() -> Self {
        Metadata {
            entities: EntitiesInfo::empty(),
        }
    }

    /// Lookup an entity by its name.
    pub fn lookup_entity(&self, entity_name: &str) -> Option<&EntityInfo> {
        self.entities.0.get(entity_name)
    }

    /// Lookup an entity by the path segment it is served under.
    pub fn lookup_entity_by_path(&self, path: &str) -> Option<&EntityInfo> {
        self.entities
            .0
            .values()
            .find(|entity| entity.path == path)
    }
}
