//! Translate the options of a read request into a query plan.

pub mod fields;
pub mod filtering;
pub mod intent;
pub mod path;
pub mod plan;
pub mod relationships;
pub mod root;
pub mod sorting;
pub mod values;

use serde::Deserialize;

use query_engine_metadata::metadata::{self, EntityInfo, ScalarType};

use crate::translation::error::Error;
use crate::translation::helpers::Env;
use intent::IntentTree;
use plan::{Pagination, QueryPlan};

/// Everything a read request asks for, gathered once per request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestOptions {
    /// Dotted field keys, possibly `*`.
    pub fields: Vec<String>,
    /// Dotted condition keys and their raw values.
    pub conditions: Vec<(String, String)>,
    /// Dotted order keys, `-` prefixed for descending.
    pub orders: Vec<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// The primary key of a specific record.
    pub key: Option<String>,
    /// Used for whichever of limit and offset is absent.
    pub pagination_defaults: Pagination,
}

impl RequestOptions {
    /// Build the intent tree of these options.
    pub fn intent_tree(&self) -> IntentTree {
        let mut tree = IntentTree::new();
        tree.add_fields(&self.fields);
        tree.add_conditions(self.conditions.iter().map(|(k, v)| (k, v)));
        tree.add_orders(&self.orders);
        tree
    }
}

/// Translate the options of a read request on an entity into a query plan.
pub fn translate(
    metadata: &metadata::Metadata,
    entity_name: &str,
    options: &RequestOptions,
) -> Result<QueryPlan, Error> {
    let env = Env::new(metadata);
    let entity = env.lookup_entity(entity_name)?;
    let tree = options.intent_tree();

    let plan = compile(&env, entity, &tree, options);

    tracing::debug!(entity = entity_name, plan = ?plan, "compiled query plan");
    Ok(plan)
}

/// Compile an intent tree against its root entity.
///
/// Never fails: anything in the tree that does not resolve against the metadata is dropped.
pub fn compile(
    env: &Env,
    entity: &EntityInfo,
    tree: &IntentTree,
    options: &RequestOptions,
) -> QueryPlan {
    let mut order_by = vec![];
    let root = root::translate_node(
        env,
        entity,
        tree.root(),
        &[entity.name.clone()],
        &mut order_by,
    );

    let key_type = entity
        .primary_key_field()
        .map_or(ScalarType::String, |field| field.r#type);

    QueryPlan {
        root,
        key: options
            .key
            .as_deref()
            .map(|key| values::coerce(key, key_type)),
        order_by: sorting::into_request_order(order_by),
        pagination: root::translate_pagination(options),
        no_rows: root::asks_for_no_rows(options),
    }
}
