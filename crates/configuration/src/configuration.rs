//! Configuration for the server.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use query_engine_metadata::metadata;

/// The 'Configuration' type collects all the information necessary to serve requests at runtime.
///
/// Values of this type are produced from a 'ParsedConfiguration' using
/// 'make_runtime_configuration', which resolves the shorthands of the file format and
/// validates the entity graph. Nothing in here is checked again per request.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    pub metadata: metadata::Metadata,
    pub pagination: PaginationDefaults,
    pub request_keys: RequestKeys,
}

/// Pagination applied to list requests that do not say otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationDefaults {
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

impl PaginationDefaults {
    pub fn is_default(&self) -> bool {
        *self == PaginationDefaults::default()
    }
}

impl Default for PaginationDefaults {
    fn default() -> PaginationDefaults {
        PaginationDefaults {
            limit: default_limit(),
            offset: 0,
        }
    }
}

fn default_limit() -> u64 {
    100
}

/// The reserved keys of a query string. Every other key is a condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestKeys {
    #[serde(default = "default_fields_key")]
    pub fields: String,
    #[serde(default = "default_order_key")]
    pub order: String,
    #[serde(default = "default_limit_key")]
    pub limit: String,
    #[serde(default = "default_offset_key")]
    pub offset: String,
    /// Keys that are neither options nor conditions, such as cache busters.
    #[serde(default = "default_ignored_keys")]
    pub ignored: Vec<String>,
}

impl RequestKeys {
    pub fn is_default(&self) -> bool {
        *self == RequestKeys::default()
    }

    pub fn is_ignored(&self, key: &str) -> bool {
        self.ignored.iter().any(|ignored| ignored == key)
    }
}

impl Default for RequestKeys {
    fn default() -> RequestKeys {
        RequestKeys {
            fields: default_fields_key(),
            order: default_order_key(),
            limit: default_limit_key(),
            offset: default_offset_key(),
            ignored: default_ignored_keys(),
        }
    }
}

fn default_fields_key() -> String {
    "fields".to_string()
}

fn default_order_key() -> String {
    "order".to_string()
}

fn default_limit_key() -> String {
    "limit".to_string()
}

fn default_offset_key() -> String {
    "offset".to_string()
}

fn default_ignored_keys() -> Vec<String> {
    vec!["_ts".to_string()]
}
