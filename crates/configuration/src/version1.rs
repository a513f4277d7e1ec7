//! The version 1 configuration file format.

use std::path::Path;

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::fs;

use query_engine_metadata::metadata::{HttpMethod, IdGeneratorKind, ScalarType};

use crate::configuration::{PaginationDefaults, RequestKeys};
use crate::error::{ParseConfigurationError, WriteParsedConfigurationError};

const CURRENT_VERSION: u32 = 1;
pub const CONFIGURATION_FILENAME: &str = "configuration.json";
pub const CONFIGURATION_JSONSCHEMA_FILENAME: &str = "schema.json";

/// The configuration file as written by users.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParsedConfiguration {
    /// Which version of the configuration format are we using
    pub version: u32,
    #[serde(default, skip_serializing_if = "PaginationDefaults::is_default")]
    pub pagination: PaginationDefaults,
    #[serde(default, skip_serializing_if = "RequestKeys::is_default")]
    pub request_keys: RequestKeys,
    /// Entities by name.
    #[serde(default)]
    pub entities: IndexMap<String, EntityDefinition>,
}

impl ParsedConfiguration {
    pub fn empty() -> Self {
        ParsedConfiguration {
            version: CURRENT_VERSION,
            pagination: PaginationDefaults::default(),
            request_keys: RequestKeys::default(),
            entities: IndexMap::new(),
        }
    }

    pub fn initial() -> Self {
        ParsedConfiguration::empty()
    }
}

/// An entity and the way it is served.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntityDefinition {
    /// The route segment of the entity. Defaults to the entity name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Fields and associations, in declaration order.
    pub fields: IndexMap<String, FieldDefinition>,
    /// Fill missing primary keys on creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_generator: Option<IdGeneratorKind>,
    /// Reject every mutation.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub readonly: bool,
    /// Allow deletes.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub removable: bool,
    /// Serve only these methods. Every method when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_methods: Option<Vec<HttpMethod>>,
}

/// A field is declared either by its bare type, as an association, or in full.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum FieldDefinition {
    Type(ScalarType),
    Association(AssociationDefinition),
    Full(FullFieldDefinition),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FullFieldDefinition {
    pub r#type: ScalarType,
    /// Whether the field is part of a wildcard selection.
    #[serde(
        default,
        alias = "whitelist",
        skip_serializing_if = "Option::is_none"
    )]
    pub query_by_default: Option<bool>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub primary_key: bool,
}

/// A belongs-to association on another entity. The foreign key field is added to the entity
/// unless it is declared explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssociationDefinition {
    /// The name of the target entity.
    pub model: String,
    /// The joined field of the target entity. Defaults to `id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// The joining field of this entity. Defaults to the association name suffixed by `Id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,
    /// Defaults to true: parents without a match are dropped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// The type of the foreign key. Defaults to the type of the joined field.
    #[serde(
        default,
        alias = "keyType",
        skip_serializing_if = "Option::is_none"
    )]
    pub r#type: Option<ScalarType>,
}

/// Parse the configuration format from a directory.
pub async fn parse_configuration(
    configuration_dir: impl AsRef<Path>,
) -> Result<ParsedConfiguration, ParseConfigurationError> {
    let configuration_file = configuration_dir.as_ref().join(CONFIGURATION_FILENAME);

    let configuration_file_contents =
        fs::read_to_string(&configuration_file)
            .await
            .map_err(|err| {
                ParseConfigurationError::IoErrorButStringified(format!(
                    "{}: {}",
                    &configuration_file.display(),
                    err
                ))
            })?;

    let parsed_config: ParsedConfiguration = serde_json::from_str(&configuration_file_contents)
        .map_err(|error| ParseConfigurationError::ParseError {
            file_path: configuration_file.clone(),
            line: error.line(),
            column: error.column(),
            message: error.to_string(),
        })?;

    if parsed_config.version != CURRENT_VERSION {
        return Err(ParseConfigurationError::UnsupportedVersion {
            file_path: configuration_file,
            version: parsed_config.version,
        });
    }

    tracing::debug!(
        file = %configuration_file.display(),
        entities = parsed_config.entities.len(),
        "parsed configuration"
    );
    Ok(parsed_config)
}

/// Write the parsed configuration and its JSON schema into a directory on disk.
pub async fn write_parsed_configuration(
    parsed_config: ParsedConfiguration,
    out_dir: impl AsRef<Path>,
) -> Result<(), WriteParsedConfigurationError> {
    let configuration_file = out_dir.as_ref().to_owned().join(CONFIGURATION_FILENAME);
    fs::create_dir_all(out_dir.as_ref()).await?;

    // create the configuration file
    fs::write(
        configuration_file,
        serde_json::to_string_pretty(&parsed_config)
            .map_err(|e| WriteParsedConfigurationError::IoError(e.into()))?
            + "\n",
    )
    .await?;

    // create the jsonschema file
    let configuration_jsonschema_file_path = out_dir
        .as_ref()
        .to_owned()
        .join(CONFIGURATION_JSONSCHEMA_FILENAME);

    let output = schemars::schema_for!(ParsedConfiguration);
    fs::write(
        &configuration_jsonschema_file_path,
        serde_json::to_string_pretty(&output)
            .map_err(|e| WriteParsedConfigurationError::IoError(e.into()))?
            + "\n",
    )
    .await?;

    Ok(())
}
