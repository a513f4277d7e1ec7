//! Compile intent nodes into plan nodes, and decide pagination for the root.

use query_engine_metadata::metadata::EntityInfo;

use super::fields;
use super::filtering;
use super::intent::IntentNode;
use super::plan::{Pagination, PlanNode};
use super::relationships;
use super::sorting::{self, SequencedDirective};
use super::RequestOptions;
use crate::translation::helpers::Env;

/// Compile an intent node against the entity it refers to.
///
/// `path` is the root entity name followed by the association hops leading to this node.
/// Order directives found on the way are pushed to `order_by`.
pub fn translate_node(
    env: &Env,
    entity: &EntityInfo,
    node: &IntentNode,
    path: &[String],
    order_by: &mut Vec<SequencedDirective>,
) -> PlanNode {
    let selection = fields::translate_fields(entity, &node.fields);
    let where_ = filtering::translate_conditions(entity, &node.conditions);
    sorting::translate_order_keys(entity, &node.order_keys, path, order_by);
    let includes = relationships::translate_includes(env, entity, &node.children, path, order_by);

    PlanNode {
        entity: entity.name.clone(),
        fields: selection,
        where_,
        includes,
    }
}

/// Pagination of the root rows.
///
/// None when a specific record is requested, or when the caller explicitly asked for zero rows.
pub fn translate_pagination(options: &RequestOptions) -> Option<Pagination> {
    if options.key.is_some() || options.limit == Some(0) {
        return None;
    }
    Some(Pagination {
        limit: options.limit.unwrap_or(options.pagination_defaults.limit),
        offset: options.offset.unwrap_or(options.pagination_defaults.offset),
    })
}

/// Whether the caller explicitly asked for zero root rows. A key lookup ignores the limit.
pub fn asks_for_no_rows(options: &RequestOptions) -> bool {
    options.key.is_none() && options.limit == Some(0)
}
