//! Handle ordering.

use query_engine_metadata::metadata::EntityInfo;

use super::intent::OrderKey;
use super::plan::OrderDirective;
use crate::translation::helpers::{resolve_field, Reference};

/// An order directive tagged with its position in the request.
pub type SequencedDirective = (usize, OrderDirective);

/// Translate the order keys of a node into directives qualified by the path of the node.
///
/// The directives are pushed to the accumulator shared by the whole plan, since ordering
/// applies to the root rows even when the field lives on an association.
pub fn translate_order_keys(
    entity: &EntityInfo,
    order_keys: &[OrderKey],
    path: &[String],
    order_by: &mut Vec<SequencedDirective>,
) {
    for order_key in order_keys {
        if let Some(field) = resolve_field(entity, Reference::OrderKey, &order_key.field) {
            let mut qualified = path.to_vec();
            qualified.push(field.name.clone());
            order_by.push((
                order_key.sequence,
                OrderDirective {
                    path: qualified,
                    direction: order_key.direction,
                },
            ));
        }
    }
}

/// Put accumulated directives back in request order.
pub fn into_request_order(mut order_by: Vec<SequencedDirective>) -> Vec<OrderDirective> {
    order_by.sort_by_key(|(sequence, _)| *sequence);
    order_by
        .into_iter()
        .map(|(_, directive)| directive)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::plan::OrderDirection;
    use super::*;

    #[test]
    fn directives_return_to_request_order() {
        let directive = |field: &str| OrderDirective {
            path: vec!["user".to_string(), field.to_string()],
            direction: OrderDirection::Asc,
        };
        let accumulated = vec![(2, directive("c")), (0, directive("a")), (1, directive("b"))];

        let fields: Vec<String> = into_request_order(accumulated)
            .into_iter()
            .filter_map(|directive| directive.path.last().cloned())
            .collect();
        assert_eq!(fields, vec!["a", "b", "c"]);
    }
}
