//! Handle filtering.

use query_engine_metadata::metadata::EntityInfo;

use super::plan::Where;
use super::values;
use crate::translation::helpers::{resolve_field, Reference};

/// Translate the raw conditions of a node into a where clause.
///
/// Conditions on unknown fields are dropped. When a field is conditioned more than once the
/// last condition wins, in the position of the first.
pub fn translate_conditions(entity: &EntityInfo, conditions: &[(String, String)]) -> Where {
    let mut where_ = Where::default();
    for (name, raw) in conditions {
        if let Some(field) = resolve_field(entity, Reference::Condition, name) {
            where_
                .0
                .insert(field.name.clone(), values::translate_value(raw, field.r#type));
        }
    }
    where_
}
