//! Accumulate field selections, conditions and order keys into an intent tree.
//!
//! The tree mirrors the dotted keys of the request: the root node is the requested entity,
//! and every association hop named by a key gets a child node. Nothing is validated here.

use indexmap::IndexMap;

use super::path::{resolve_path, ResolvedPath};
use super::plan::OrderDirection;

/// The wildcard field selection.
pub const WILDCARD: &str = "*";

/// What the request asks of a single entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntentNode {
    /// Selected field names in request order, without duplicates. May contain `*`.
    pub fields: Vec<String>,
    /// Raw `(field, value)` conditions in request order.
    pub conditions: Vec<(String, String)>,
    pub order_keys: Vec<OrderKey>,
    pub children: IndexMap<String, IntentNode>,
}

/// A requested ordering on a field of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderKey {
    pub field: String,
    pub direction: OrderDirection,
    /// Position among all the order keys of the request, across nodes.
    pub sequence: usize,
}

/// The tree of intents of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntentTree {
    root: IntentNode,
    order_sequence: usize,
}

impl IntentTree {
    pub fn new() -> IntentTree {
        IntentTree::default()
    }

    pub fn root(&self) -> &IntentNode {
        &self.root
    }

    /// Add dotted field selections. Blank keys are ignored.
    pub fn add_fields<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for key in keys {
            let key = key.as_ref().trim();
            if key.is_empty() {
                continue;
            }
            let ResolvedPath { hops, leaf, .. } = resolve_path(key, ());
            let node = self.node_mut(hops);
            if !node.fields.contains(&leaf) {
                node.fields.push(leaf);
            }
        }
    }

    /// Add dotted conditions. Values are trimmed.
    pub fn add_conditions<I, K, V>(&mut self, conditions: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in conditions {
            let ResolvedPath {
                hops,
                leaf,
                payload,
            } = resolve_path(key.as_ref(), value.as_ref().trim().to_string());
            self.node_mut(hops).conditions.push((leaf, payload));
        }
    }

    /// Add dotted order keys. A leading `-` orders descending. Blank keys are ignored.
    pub fn add_orders<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for key in keys {
            let key = key.as_ref().trim();
            let (key, direction) = match key.strip_prefix('-') {
                Some(rest) => (rest, OrderDirection::Desc),
                None => (key, OrderDirection::Asc),
            };
            if key.is_empty() {
                continue;
            }
            let ResolvedPath {
                hops,
                leaf,
                payload: direction,
            } = resolve_path(key, direction);
            let sequence = self.order_sequence;
            self.order_sequence += 1;
            self.node_mut(hops).order_keys.push(OrderKey {
                field: leaf,
                direction,
                sequence,
            });
        }
    }

    /// Drill into the node chain named by the hops, creating nodes as needed.
    fn node_mut(&mut self, hops: Vec<String>) -> &mut IntentNode {
        hops.into_iter().fold(&mut self.root, |node, hop| {
            node.children.entry(hop).or_default()
        })
    }
}
