//! Helpers for processing requests against the entity metadata.

use query_engine_metadata::metadata;

use super::error::Error;

/// Static information from the metadata.
#[derive(Debug, Clone, Copy)]
pub struct Env<'a> {
    metadata: &'a metadata::Metadata,
}

/// The kinds of names a request can reference on an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    Field,
    Condition,
    OrderKey,
    Association,
}

impl<'a> Env<'a> {
    /// Create a new Env by supplying the metadata.
    pub fn new(metadata: &'a metadata::Metadata) -> Env<'a> {
        Env { metadata }
    }

    /// Lookup the entity a request is addressed to.
    pub fn lookup_entity(&self, entity_name: &str) -> Result<&'a metadata::EntityInfo, Error> {
        self.metadata
            .lookup_entity(entity_name)
            .ok_or_else(|| Error::EntityNotFound(entity_name.to_string()))
    }

    /// Lookup the target of an association. A dangling target is skipped like any other
    /// unknown reference.
    pub fn lookup_association_target(
        &self,
        association: &metadata::AssociationInfo,
    ) -> Option<&'a metadata::EntityInfo> {
        self.metadata.lookup_entity(&association.target)
    }
}

/// Resolve a name referenced by the request against an entity, or skip it.
///
/// Every field, condition, order key and association goes through here, so an unknown
/// reference is always dropped the same way: logged and ignored.
pub fn resolve_or_skip<'e, T: ?Sized>(
    entity: &'e metadata::EntityInfo,
    reference: Reference,
    name: &str,
    lookup: impl FnOnce(&'e metadata::EntityInfo, &str) -> Option<&'e T>,
) -> Option<&'e T> {
    let resolved = lookup(entity, name);
    if resolved.is_none() {
        tracing::debug!(
            entity = %entity.name,
            reference = ?reference,
            name,
            "skipping unknown reference"
        );
    }
    resolved
}

/// Resolve a declared field, or skip it.
pub fn resolve_field<'e>(
    entity: &'e metadata::EntityInfo,
    reference: Reference,
    name: &str,
) -> Option<&'e metadata::FieldInfo> {
    resolve_or_skip(entity, reference, name, metadata::EntityInfo::lookup_field)
}

/// Resolve a declared association, or skip it.
pub fn resolve_association<'e>(
    entity: &'e metadata::EntityInfo,
    name: &str,
) -> Option<&'e metadata::AssociationInfo> {
    resolve_or_skip(
        entity,
        Reference::Association,
        name,
        metadata::EntityInfo::lookup_association,
    )
}
