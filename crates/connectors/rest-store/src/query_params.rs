//! Read the query string of a request into request options.
//!
//! The reserved keys are configurable. `fields` and `order` take comma-separated lists and may be
//! repeated; `limit` and `offset` are ignored when they do not parse. Every other key that is not
//! ignored is a condition on its (dotted) field.

use query_engine_translation::translation::query::plan::Pagination;
use query_engine_translation::translation::query::RequestOptions;
use rest_store_configuration::Configuration;

pub fn request_options(pairs: Vec<(String, String)>, configuration: &Configuration) -> RequestOptions {
    let keys = &configuration.request_keys;
    let mut options = RequestOptions {
        pagination_defaults: Pagination {
            limit: configuration.pagination.limit,
            offset: configuration.pagination.offset,
        },
        ..RequestOptions::default()
    };

    for (key, value) in pairs {
        if key == keys.fields {
            options.fields.extend(split_list(&value));
        } else if key == keys.order {
            options.orders.extend(split_list(&value));
        } else if key == keys.limit {
            options.limit = parse_count(&key, &value);
        } else if key == keys.offset {
            options.offset = parse_count(&key, &value);
        } else if !keys.is_ignored(&key) {
            options.conditions.push((key, value));
        }
    }
    options
}

fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
}

fn parse_count(key: &str, value: &str) -> Option<u64> {
    match value.trim().parse() {
        Ok(count) => Some(count),
        Err(_) => {
            tracing::debug!(key, value, "ignoring unparsable count");
            None
        }
    }
}
