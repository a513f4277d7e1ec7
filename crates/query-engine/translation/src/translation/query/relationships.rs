//! Handle the associations a request reaches into.

use indexmap::IndexMap;

use query_engine_metadata::metadata::EntityInfo;

use super::intent::IntentNode;
use super::plan::Include;
use super::root;
use super::sorting::SequencedDirective;
use crate::translation::helpers::{resolve_association, Env};

/// Translate the child nodes of an intent node into includes.
///
/// Only the associations named by the request are followed, so cyclic association graphs
/// are walked exactly as deep as asked. A child whose name is not a declared association is
/// dropped along with everything beneath it.
pub fn translate_includes(
    env: &Env,
    entity: &EntityInfo,
    children: &IndexMap<String, IntentNode>,
    path: &[String],
    order_by: &mut Vec<SequencedDirective>,
) -> Vec<Include> {
    let mut includes = vec![];
    for (name, child) in children {
        let Some(association) = resolve_association(entity, name) else {
            continue;
        };
        let Some(target) = env.lookup_association_target(association) else {
            tracing::debug!(
                entity = %entity.name,
                association = %name,
                target = %association.target,
                "skipping association with an unknown target"
            );
            continue;
        };

        let mut child_path = path.to_vec();
        child_path.push(name.clone());

        includes.push(Include {
            association: name.clone(),
            foreign_key: association.foreign_key.clone(),
            key: association.key.clone(),
            required: association.required,
            plan: root::translate_node(env, target, child, &child_path, order_by),
        });
    }
    includes
}
