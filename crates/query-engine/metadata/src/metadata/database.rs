//! Metadata information regarding the entities and their declared fields.

use std::collections::BTreeMap;

use enum_iterator::Sequence;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The scalar types a field can be declared with.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Sequence, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    Integer,
    Float,
    String,
    Boolean,
    Date,
    Identifier,
}

impl ScalarType {
    /// Numeric types are coerced when used in filter values.
    pub fn is_numeric(self) -> bool {
        matches!(self, ScalarType::Integer | ScalarType::Float)
    }
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ScalarType::Integer => "integer",
            ScalarType::Float => "float",
            ScalarType::String => "string",
            ScalarType::Boolean => "boolean",
            ScalarType::Date => "date",
            ScalarType::Identifier => "identifier",
        };
        write!(f, "{name}")
    }
}

/// The kinds of server-side identifier generation an entity can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum IdGeneratorKind {
    Uuid,
    Sequence,
}

/// The HTTP methods an entity can be served with.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Sequence, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        };
        write!(f, "{name}")
    }
}

/// Mapping from an entity name to its information.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct EntitiesInfo(pub BTreeMap<String, EntityInfo>);

impl EntitiesInfo {
    pub fn empty() -> Self {
        EntitiesInfo(BTreeMap::new())
    }
}

/// Information about an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntityInfo {
    pub name: String,
    /// The path segment this entity is served under.
    pub path: String,
    /// Declared fields, in declaration order.
    pub fields: IndexMap<String, FieldInfo>,
    pub primary_key: String,
    #[serde(default)]
    pub associations: IndexMap<String, AssociationInfo>,
    #[serde(default)]
    pub id_generator: Option<IdGeneratorKind>,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default)]
    pub removable: bool,
    /// Methods the entity is served with. Every method when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_methods: Option<Vec<HttpMethod>>,
}

/// Information about a declared field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldInfo {
    pub name: String,
    pub r#type: ScalarType,
    /// Whether the field is part of a wildcard (`*`) selection.
    #[serde(default = "query_by_default_default")]
    pub query_by_default: bool,
}

fn query_by_default_default() -> bool {
    true
}

/// A belongs-to association: `parent.foreign_key` references `target.key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssociationInfo {
    /// Name of the target entity.
    pub target: String,
    /// Field on the target entity.
    pub key: String,
    /// Field on the source entity.
    pub foreign_key: String,
    /// Required associations are inner joins, optional ones are outer joins.
    pub required: bool,
}

impl EntityInfo {
    /// Lookup a declared field.
    pub fn lookup_field(&self, field_name: &str) -> Option<&FieldInfo> {
        self.fields.get(field_name)
    }

    /// Lookup a declared association.
    pub fn lookup_association(&self, association_name: &str) -> Option<&AssociationInfo> {
        self.associations.get(association_name)
    }

    /// The primary key field.
    pub fn primary_key_field(&self) -> Option<&FieldInfo> {
        self.fields.get(&self.primary_key)
    }

    /// Fields selected by a wildcard, in declaration order.
    pub fn visible_fields(&self) -> impl Iterator<Item = &FieldInfo> {
        self.fields.values().filter(|field| field.query_by_default)
    }

    /// Whether requests with this method are served.
    pub fn allows_method(&self, method: HttpMethod) -> bool {
        self.http_methods
            .as_ref()
            .map_or(true, |methods| methods.contains(&method))
    }

    /// Whether any field is excluded from wildcard selection.
    pub fn has_hidden_fields(&self) -> bool {
        self.fields.values().any(|field| !field.query_by_default)
    }
}
