//! An in-memory store running query plans with relational semantics.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use query_engine_metadata::metadata::{self, EntityInfo, ScalarType};
use query_engine_translation::translation::mutation::Record;
use query_engine_translation::translation::query::plan::{
    OrderDirection, OrderDirective, PlanNode, QueryPlan,
};

use crate::comparison::{compare_json, compare_value, matches_where, same_key};
use crate::error::Error;
use crate::executor::{Executor, Row};

type Tables = BTreeMap<String, Vec<Row>>;

/// Rows of every entity, kept in insertion order.
#[derive(Debug)]
pub struct MemoryStore {
    metadata: metadata::Metadata,
    tables: RwLock<Tables>,
}

/// A root row together with the rows its includes joined to it.
struct Joined<'a> {
    row: &'a Row,
    includes: Vec<(&'a str, Option<Joined<'a>>)>,
}

impl MemoryStore {
    pub fn new(metadata: metadata::Metadata) -> MemoryStore {
        let tables = metadata
            .entities
            .0
            .keys()
            .map(|name| (name.clone(), vec![]))
            .collect();
        MemoryStore {
            metadata,
            tables: RwLock::new(tables),
        }
    }

    /// Insert rows as they are, without checking keys.
    pub async fn seed(&self, entity_name: &str, rows: Vec<Row>) -> Result<(), Error> {
        let mut tables = self.tables.write().await;
        tables
            .get_mut(entity_name)
            .ok_or_else(|| Error::EntityNotFound(entity_name.to_string()))?
            .extend(rows);
        Ok(())
    }

    fn lookup_entity(&self, entity_name: &str) -> Result<&EntityInfo, Error> {
        self.metadata
            .lookup_entity(entity_name)
            .ok_or_else(|| Error::EntityNotFound(entity_name.to_string()))
    }

    /// The root rows a plan matches, joined with their includes, before ordering.
    fn select<'a>(&self, tables: &'a Tables, plan: &'a QueryPlan) -> Result<Vec<Joined<'a>>, Error> {
        let entity = self.lookup_entity(&plan.root.entity)?;
        let rows = tables
            .get(&plan.root.entity)
            .ok_or_else(|| Error::EntityNotFound(plan.root.entity.clone()))?;

        Ok(rows
            .iter()
            .filter(|row| matches_key(entity, row, plan))
            .filter_map(|row| join_node(tables, &plan.root, row))
            .collect())
    }

    fn project(&self, node: &PlanNode, joined: &Joined) -> Row {
        let mut projected = Row::new();
        if let Some(entity) = self.metadata.lookup_entity(&node.entity) {
            for name in node.fields.field_names(entity) {
                if let Some(value) = joined.row.get(name) {
                    projected.insert(name.to_string(), value.clone());
                }
            }
        }
        for (include, (name, child)) in node.includes.iter().zip(&joined.includes) {
            let value = match child {
                Some(child) => serde_json::Value::Object(self.project(&include.plan, child)),
                None => serde_json::Value::Null,
            };
            projected.insert((*name).to_string(), value);
        }
        projected
    }

    /// Check the key of a new record, assigning the next integer when an integer key is absent.
    fn check_new_record(
        entity: &EntityInfo,
        rows: &[Row],
        pending: &[Row],
        record: &mut Record,
    ) -> Result<serde_json::Value, Error> {
        let key = match record.get(&entity.primary_key).filter(|key| !key.is_null()) {
            Some(key) => key.clone(),
            None => {
                let key = next_integer_key(entity, rows.iter().chain(pending))?;
                record.insert(entity.primary_key.clone(), key.clone());
                key
            }
        };

        let taken = rows.iter().chain(pending).any(|row| {
            row.get(&entity.primary_key)
                .is_some_and(|existing| same_key(existing, &key))
        });
        if taken {
            return Err(Error::DuplicateKey {
                entity: entity.name.clone(),
                key: key.to_string(),
            });
        }
        Ok(key)
    }
}

fn matches_key(entity: &EntityInfo, row: &Row, plan: &QueryPlan) -> bool {
    match &plan.key {
        None => true,
        Some(key) => row
            .get(&entity.primary_key)
            .and_then(|stored| compare_value(stored, key))
            == Some(Ordering::Equal),
    }
}

/// Join the includes of a node to a row. None when the row, or a required include, does not
/// match.
fn join_node<'a>(tables: &'a Tables, node: &'a PlanNode, row: &'a Row) -> Option<Joined<'a>> {
    if !matches_where(row, &node.where_) {
        return None;
    }

    let mut includes = Vec::with_capacity(node.includes.len());
    for include in &node.includes {
        let joined = row
            .get(&include.foreign_key)
            .filter(|foreign_key| !foreign_key.is_null())
            .and_then(|foreign_key| {
                tables
                    .get(&include.plan.entity)?
                    .iter()
                    .filter(|child| {
                        child
                            .get(&include.key)
                            .is_some_and(|key| same_key(key, foreign_key))
                    })
                    .find_map(|child| join_node(tables, &include.plan, child))
            });
        if joined.is_none() && include.required {
            return None;
        }
        includes.push((include.association.as_str(), joined));
    }
    Some(Joined { row, includes })
}

/// The value a directive orders by: the path is the root entity, the association hops, then
/// the field.
fn order_value<'a>(joined: &Joined<'a>, path: &[String]) -> Option<&'a serde_json::Value> {
    let (field, hops) = path.get(1..)?.split_last()?;
    let mut current = joined;
    for hop in hops {
        current = current
            .includes
            .iter()
            .find(|(name, _)| *name == hop.as_str())?
            .1
            .as_ref()?;
    }
    current.row.get(field)
}

fn compare_rows(left: &Joined, right: &Joined, order_by: &[OrderDirective]) -> Ordering {
    for directive in order_by {
        let ordering = compare_json(
            order_value(left, &directive.path),
            order_value(right, &directive.path),
        );
        let ordering = match directive.direction {
            OrderDirection::Asc => ordering,
            OrderDirection::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn next_integer_key<'a>(
    entity: &EntityInfo,
    rows: impl Iterator<Item = &'a Row>,
) -> Result<serde_json::Value, Error> {
    match entity.primary_key_field().map(|field| field.r#type) {
        Some(ScalarType::Integer) => {
            let max = rows
                .filter_map(|row| row.get(&entity.primary_key)?.as_i64())
                .max()
                .unwrap_or(0);
            let next = max.checked_add(1).ok_or_else(|| {
                Error::Internal(format!(
                    "integer keys of entity '{}' are exhausted",
                    entity.name
                ))
            })?;
            Ok(serde_json::Value::from(next))
        }
        _ => Err(Error::Internal(format!(
            "no primary key value for a new record of entity '{}'",
            entity.name
        ))),
    }
}

#[async_trait]
impl Executor for MemoryStore {
    async fn find_all(&self, plan: &QueryPlan) -> Result<Vec<Row>, Error> {
        if plan.no_rows {
            return Ok(vec![]);
        }

        let tables = self.tables.read().await;
        let mut selected = self.select(&tables, plan)?;

        // stable, so ties keep insertion order
        selected.sort_by(|left, right| compare_rows(left, right, &plan.order_by));

        let (offset, limit) = match plan.pagination {
            Some(pagination) => (
                usize::try_from(pagination.offset).unwrap_or(usize::MAX),
                usize::try_from(pagination.limit).unwrap_or(usize::MAX),
            ),
            None => (0, usize::MAX),
        };

        let rows: Vec<Row> = selected
            .iter()
            .skip(offset)
            .take(limit)
            .map(|joined| self.project(&plan.root, joined))
            .collect();

        tracing::debug!(entity = %plan.root.entity, rows = rows.len(), "query executed");
        Ok(rows)
    }

    async fn create(
        &self,
        entity: &EntityInfo,
        mut record: Record,
    ) -> Result<serde_json::Value, Error> {
        let mut tables = self.tables.write().await;
        let rows = tables
            .get_mut(&entity.name)
            .ok_or_else(|| Error::EntityNotFound(entity.name.clone()))?;

        let key = MemoryStore::check_new_record(entity, rows, &[], &mut record)?;
        rows.push(record);

        tracing::debug!(entity = %entity.name, key = %key, "record created");
        Ok(key)
    }

    async fn create_batch(
        &self,
        entity: &EntityInfo,
        records: Vec<Record>,
    ) -> Result<Vec<serde_json::Value>, Error> {
        let mut tables = self.tables.write().await;
        let rows = tables
            .get_mut(&entity.name)
            .ok_or_else(|| Error::EntityNotFound(entity.name.clone()))?;

        let mut pending: Vec<Row> = Vec::with_capacity(records.len());
        let mut keys = Vec::with_capacity(records.len());
        for mut record in records {
            keys.push(MemoryStore::check_new_record(
                entity,
                rows,
                &pending,
                &mut record,
            )?);
            pending.push(record);
        }
        rows.extend(pending);

        tracing::debug!(entity = %entity.name, records = keys.len(), "records created");
        Ok(keys)
    }

    async fn update(
        &self,
        entity: &EntityInfo,
        record: Record,
        key: &serde_json::Value,
    ) -> Result<u64, Error> {
        let mut tables = self.tables.write().await;
        let rows = tables
            .get_mut(&entity.name)
            .ok_or_else(|| Error::EntityNotFound(entity.name.clone()))?;

        let mut updated = 0;
        for row in rows.iter_mut().filter(|row| {
            row.get(&entity.primary_key)
                .is_some_and(|existing| same_key(existing, key))
        }) {
            for (name, value) in &record {
                if *name != entity.primary_key {
                    row.insert(name.clone(), value.clone());
                }
            }
            updated += 1;
        }

        tracing::debug!(entity = %entity.name, key = %key, updated, "records updated");
        Ok(updated)
    }

    async fn delete(&self, plan: &QueryPlan) -> Result<u64, Error> {
        let entity = self.lookup_entity(&plan.root.entity)?;
        let mut tables = self.tables.write().await;

        let doomed: BTreeSet<usize> = {
            let rows = tables
                .get(&entity.name)
                .ok_or_else(|| Error::EntityNotFound(entity.name.clone()))?;
            rows.iter()
                .enumerate()
                .filter(|(_, row)| matches_key(entity, row, plan))
                .filter(|(_, row)| join_node(&tables, &plan.root, row).is_some())
                .map(|(index, _)| index)
                .collect()
        };

        let rows = tables
            .get_mut(&entity.name)
            .ok_or_else(|| Error::EntityNotFound(entity.name.clone()))?;
        let mut index = 0;
        rows.retain(|_| {
            let keep = !doomed.contains(&index);
            index += 1;
            keep
        });
        let deleted = u64::try_from(doomed.len()).unwrap_or(u64::MAX);

        tracing::debug!(entity = %entity.name, deleted, "records deleted");
        Ok(deleted)
    }
}
