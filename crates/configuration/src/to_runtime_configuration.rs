//! Convert a parsed configuration into the runtime configuration, validating the entity graph.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use query_engine_metadata::metadata::{
    self, AssociationInfo, EntitiesInfo, EntityInfo, FieldInfo, ScalarType,
};

use crate::configuration::Configuration;
use crate::error::MakeRuntimeConfigurationError;
use crate::version1::{AssociationDefinition, EntityDefinition, FieldDefinition, ParsedConfiguration};

const DEFAULT_PRIMARY_KEY: &str = "id";
const DEFAULT_ASSOCIATION_KEY: &str = "id";

/// Convert the parsed configuration into the configuration used at runtime.
pub fn make_runtime_configuration(
    parsed_config: ParsedConfiguration,
) -> Result<Configuration, MakeRuntimeConfigurationError> {
    let mut entities = BTreeMap::new();
    let mut paths: BTreeMap<String, String> = BTreeMap::new();

    for (name, definition) in &parsed_config.entities {
        let entity = convert_entity(&parsed_config, name, definition)?;
        if let Some(first) = paths.insert(entity.path.clone(), name.clone()) {
            return Err(MakeRuntimeConfigurationError::DuplicatePath {
                path: entity.path,
                first,
                second: name.clone(),
            });
        }
        entities.insert(name.clone(), entity);
    }

    tracing::info!(entities = entities.len(), "loaded entity metadata");
    Ok(Configuration {
        metadata: metadata::Metadata {
            entities: EntitiesInfo(entities),
        },
        pagination: parsed_config.pagination,
        request_keys: parsed_config.request_keys,
    })
}

fn convert_entity(
    parsed_config: &ParsedConfiguration,
    name: &str,
    definition: &EntityDefinition,
) -> Result<EntityInfo, MakeRuntimeConfigurationError> {
    let mut fields = IndexMap::new();
    let mut associations = IndexMap::new();
    let mut flagged_primary_keys = vec![];

    for (field_name, field) in &definition.fields {
        match field {
            FieldDefinition::Type(scalar_type) => {
                fields.insert(field_name.clone(), make_field(field_name, *scalar_type, true));
            }
            FieldDefinition::Full(full) => {
                fields.insert(
                    field_name.clone(),
                    make_field(field_name, full.r#type, full.query_by_default.unwrap_or(true)),
                );
                if full.primary_key {
                    flagged_primary_keys.push(field_name.clone());
                }
            }
            FieldDefinition::Association(association) => {
                let info = convert_association(parsed_config, name, field_name, association)?;
                // An explicit declaration of the foreign key takes its own position.
                if !declares_plain_field(definition, &info.foreign_key) {
                    let key_type = association_key_type(parsed_config, &info, association);
                    fields.insert(
                        info.foreign_key.clone(),
                        make_field(&info.foreign_key, key_type, true),
                    );
                }
                associations.insert(field_name.clone(), info);
            }
        }
    }

    let primary_key = match flagged_primary_keys.as_slice() {
        [] if fields.contains_key(DEFAULT_PRIMARY_KEY) => DEFAULT_PRIMARY_KEY.to_string(),
        [] => {
            return Err(MakeRuntimeConfigurationError::MissingPrimaryKey {
                entity: name.to_string(),
            })
        }
        [primary_key] => primary_key.clone(),
        _ => {
            return Err(MakeRuntimeConfigurationError::DuplicatePrimaryKey {
                entity: name.to_string(),
                fields: flagged_primary_keys,
            })
        }
    };

    Ok(EntityInfo {
        name: name.to_string(),
        path: definition.path.clone().unwrap_or_else(|| name.to_string()),
        fields,
        primary_key,
        associations,
        id_generator: definition.id_generator,
        readonly: definition.readonly,
        removable: definition.removable,
        http_methods: definition.http_methods.clone(),
    })
}

fn make_field(name: &str, scalar_type: ScalarType, query_by_default: bool) -> FieldInfo {
    FieldInfo {
        name: name.to_string(),
        r#type: scalar_type,
        query_by_default,
    }
}

fn convert_association(
    parsed_config: &ParsedConfiguration,
    entity: &str,
    association_name: &str,
    association: &AssociationDefinition,
) -> Result<AssociationInfo, MakeRuntimeConfigurationError> {
    let target = parsed_config.entities.get(&association.model).ok_or_else(|| {
        MakeRuntimeConfigurationError::UnknownAssociationTarget {
            entity: entity.to_string(),
            association: association_name.to_string(),
            target: association.model.clone(),
        }
    })?;

    let key = association
        .key
        .clone()
        .unwrap_or_else(|| DEFAULT_ASSOCIATION_KEY.to_string());
    if !declares_plain_field(target, &key) {
        return Err(MakeRuntimeConfigurationError::UnknownKeyField {
            entity: entity.to_string(),
            association: association_name.to_string(),
            target: association.model.clone(),
            key,
        });
    }

    Ok(AssociationInfo {
        target: association.model.clone(),
        key,
        foreign_key: association
            .foreign_key
            .clone()
            .unwrap_or_else(|| format!("{association_name}Id")),
        required: association.required.unwrap_or(true),
    })
}

/// The foreign key is typed like the key it joins on, unless declared otherwise.
fn association_key_type(
    parsed_config: &ParsedConfiguration,
    info: &AssociationInfo,
    association: &AssociationDefinition,
) -> ScalarType {
    association.r#type.unwrap_or_else(|| {
        parsed_config
            .entities
            .get(&info.target)
            .and_then(|target| target.fields.get(&info.key))
            .and_then(plain_field_type)
            .unwrap_or(ScalarType::Identifier)
    })
}

fn declares_plain_field(definition: &EntityDefinition, field_name: &str) -> bool {
    definition
        .fields
        .get(field_name)
        .and_then(plain_field_type)
        .is_some()
}

fn plain_field_type(field: &FieldDefinition) -> Option<ScalarType> {
    match field {
        FieldDefinition::Type(scalar_type) => Some(*scalar_type),
        FieldDefinition::Full(full) => Some(full.r#type),
        FieldDefinition::Association(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use query_engine_metadata::metadata::HttpMethod;

    use super::*;

    fn parse(value: serde_json::Value) -> ParsedConfiguration {
        serde_json::from_value(value).unwrap()
    }

    fn field_names(entity: &EntityInfo) -> Vec<&str> {
        entity.fields.keys().map(String::as_str).collect()
    }

    #[test]
    fn associations_add_their_foreign_keys() {
        let configuration = make_runtime_configuration(parse(serde_json::json!({
            "version": 1,
            "entities": {
                "tenant": {
                    "path": "tenants",
                    "fields": { "id": "integer", "name": "string" }
                },
                "user": {
                    "path": "users",
                    "fields": {
                        "id": "identifier",
                        "tenant": { "model": "tenant" },
                        "password": { "type": "string", "queryByDefault": false },
                        "mentor": { "model": "user", "foreignKey": "mentor", "required": false }
                    }
                }
            }
        })))
        .unwrap();

        let user = configuration.metadata.lookup_entity("user").unwrap();
        assert_eq!(field_names(user), vec!["id", "tenantId", "password", "mentor"]);
        assert_eq!(user.fields["tenantId"].r#type, ScalarType::Integer);
        assert_eq!(user.fields["mentor"].r#type, ScalarType::Identifier);
        assert!(!user.fields["password"].query_by_default);
        assert_eq!(
            user.associations["tenant"],
            AssociationInfo {
                target: "tenant".to_string(),
                key: "id".to_string(),
                foreign_key: "tenantId".to_string(),
                required: true,
            }
        );
        assert!(!user.associations["mentor"].required);
        assert_eq!(
            configuration
                .metadata
                .lookup_entity_by_path("tenants")
                .map(|entity| entity.name.as_str()),
            Some("tenant")
        );
    }

    #[test]
    fn explicit_foreign_keys_keep_their_declaration() {
        let configuration = make_runtime_configuration(parse(serde_json::json!({
            "version": 1,
            "entities": {
                "tenant": { "fields": { "id": "integer" } },
                "user": {
                    "fields": {
                        "id": "integer",
                        "tenant": { "model": "tenant" },
                        "tenantId": { "type": "integer", "whitelist": false }
                    }
                }
            }
        })))
        .unwrap();

        let user = configuration.metadata.lookup_entity("user").unwrap();
        assert_eq!(field_names(user), vec!["id", "tenantId"]);
        assert!(!user.fields["tenantId"].query_by_default);
        assert_eq!(user.path, "user");
    }

    #[test]
    fn http_methods_are_carried_over() {
        let configuration = make_runtime_configuration(parse(serde_json::json!({
            "version": 1,
            "entities": {
                "note": { "fields": { "id": "integer" }, "httpMethods": ["get", "patch"] },
                "tag": { "fields": { "id": "integer" } }
            }
        })))
        .unwrap();

        let note = configuration.metadata.lookup_entity("note").unwrap();
        assert_eq!(
            note.http_methods,
            Some(vec![HttpMethod::Get, HttpMethod::Patch])
        );
        assert!(!note.allows_method(HttpMethod::Delete));

        let tag = configuration.metadata.lookup_entity("tag").unwrap();
        assert_eq!(tag.http_methods, None);
        assert!(tag.allows_method(HttpMethod::Delete));
    }

    #[test]
    fn primary_key_is_flagged_or_named_id() {
        let configuration = make_runtime_configuration(parse(serde_json::json!({
            "version": 1,
            "entities": {
                "code": {
                    "fields": {
                        "id": "integer",
                        "code": { "type": "string", "primaryKey": true }
                    }
                }
            }
        })))
        .unwrap();
        assert_eq!(
            configuration.metadata.lookup_entity("code").unwrap().primary_key,
            "code"
        );

        let missing = make_runtime_configuration(parse(serde_json::json!({
            "version": 1,
            "entities": { "code": { "fields": { "code": "string" } } }
        })));
        assert_eq!(
            missing,
            Err(MakeRuntimeConfigurationError::MissingPrimaryKey {
                entity: "code".to_string()
            })
        );
    }

    #[test]
    fn dangling_associations_are_rejected() {
        let result = make_runtime_configuration(parse(serde_json::json!({
            "version": 1,
            "entities": {
                "user": { "fields": { "id": "integer", "tenant": { "model": "tenant" } } }
            }
        })));
        assert_eq!(
            result,
            Err(MakeRuntimeConfigurationError::UnknownAssociationTarget {
                entity: "user".to_string(),
                association: "tenant".to_string(),
                target: "tenant".to_string(),
            })
        );

        let result = make_runtime_configuration(parse(serde_json::json!({
            "version": 1,
            "entities": {
                "tenant": { "fields": { "id": "integer" } },
                "user": {
                    "fields": { "id": "integer", "tenant": { "model": "tenant", "key": "code" } }
                }
            }
        })));
        assert!(matches!(
            result,
            Err(MakeRuntimeConfigurationError::UnknownKeyField { key, .. }) if key == "code"
        ));
    }

    #[test]
    fn paths_are_unique() {
        let result = make_runtime_configuration(parse(serde_json::json!({
            "version": 1,
            "entities": {
                "a": { "path": "things", "fields": { "id": "integer" } },
                "b": { "path": "things", "fields": { "id": "integer" } }
            }
        })));
        assert!(matches!(
            result,
            Err(MakeRuntimeConfigurationError::DuplicatePath { path, .. }) if path == "things"
        ));
    }
}
