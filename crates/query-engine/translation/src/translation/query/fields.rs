//! Handle field selection.

use query_engine_metadata::metadata::EntityInfo;

use super::intent::WILDCARD;
use super::plan::Selection;
use crate::translation::helpers::{resolve_field, Reference};

/// Translate the requested field names of a node to a selection.
///
/// No fields, or the wildcard anywhere in the list, selects every visible field.
/// Unknown fields are dropped.
pub fn translate_fields(entity: &EntityInfo, requested: &[String]) -> Selection {
    if requested.is_empty() || requested.iter().any(|field| field == WILDCARD) {
        return translate_wildcard(entity);
    }

    Selection::Fields(
        requested
            .iter()
            .filter_map(|name| resolve_field(entity, Reference::Field, name))
            .map(|field| field.name.clone())
            .collect(),
    )
}

/// Hidden fields must not reach the executor, so an entity with any of them gets an explicit
/// list instead of `AllFields`.
pub fn translate_wildcard(entity: &EntityInfo) -> Selection {
    if entity.has_hidden_fields() {
        Selection::Fields(
            entity
                .visible_fields()
                .map(|field| field.name.clone())
                .collect(),
        )
    } else {
        Selection::AllFields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(password_visible: bool) -> EntityInfo {
        serde_json::from_value(serde_json::json!({
            "name": "user",
            "path": "users",
            "fields": {
                "id": { "name": "id", "type": "integer" },
                "password": { "name": "password", "type": "string", "queryByDefault": password_visible },
                "loginId": { "name": "loginId", "type": "string" }
            },
            "primaryKey": "id"
        }))
        .unwrap()
    }

    #[test]
    fn wildcard_without_hidden_fields_selects_declared_fields_in_order() {
        let entity = entity(true);
        let selection = translate_fields(&entity, &["*".to_string()]);

        assert_eq!(selection, Selection::AllFields);
        assert_eq!(selection.field_names(&entity), vec!["id", "password", "loginId"]);
    }

    #[test]
    fn wildcard_anywhere_wins_over_named_fields() {
        let entity = entity(false);
        let selection = translate_fields(&entity, &["loginId".to_string(), "*".to_string()]);

        assert_eq!(
            selection,
            Selection::Fields(vec!["id".to_string(), "loginId".to_string()])
        );
    }

    #[test]
    fn named_hidden_fields_are_selected() {
        let entity = entity(false);
        let selection = translate_fields(
            &entity,
            &["password".to_string(), "ghost".to_string()],
        );

        assert_eq!(selection, Selection::Fields(vec!["password".to_string()]));
    }
}
