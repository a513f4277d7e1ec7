//! Prepare request bodies into value sets to be written by an executor.

pub mod id_generator;

use serde::Deserialize;

use query_engine_metadata::metadata::EntityInfo;

use super::error::Error;
use super::query::values;
use id_generator::{IdGenerationError, IdGenerator};

/// A record as found in a request body.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// A request body: either one record or an ordered batch of them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Batch(Vec<Record>),
    Single(Record),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
}

/// Records reduced to the declared fields of their entity, in input order.
#[derive(Debug, Clone, PartialEq)]
pub enum PreparedValues {
    Single(Record),
    Batch(Vec<Record>),
}

impl PreparedValues {
    pub fn len(&self) -> usize {
        match self {
            PreparedValues::Single(_) => 1,
            PreparedValues::Batch(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reject mutations on an entity that is only served for reading.
pub fn check_writable(entity: &EntityInfo) -> Result<(), Error> {
    if entity.readonly {
        Err(Error::NotSupported(format!(
            "Mutating the readonly entity '{}'",
            entity.name
        )))
    } else {
        Ok(())
    }
}

/// Reject deletes on an entity that is not removable.
pub fn check_removable(entity: &EntityInfo) -> Result<(), Error> {
    check_writable(entity)?;
    if entity.removable {
        Ok(())
    } else {
        Err(Error::NotSupported(format!(
            "Deleting from the entity '{}'",
            entity.name
        )))
    }
}

/// Prepare a request body for a mutation on an entity.
///
/// Only declared fields are kept. On creation, a missing primary key is filled by the
/// identifier generator when there is one. A batch asks the generator for one identifier per
/// record up front, in a single call, and caller-supplied keys are kept over generated ones.
pub async fn prepare_values(
    entity: &EntityInfo,
    payload: Payload,
    kind: MutationKind,
    id_generator: Option<&dyn IdGenerator>,
) -> Result<PreparedValues, Error> {
    check_writable(entity)?;
    let id_generator = id_generator.filter(|_| kind == MutationKind::Create);

    let prepared = match payload {
        Payload::Single(record) => {
            PreparedValues::Single(prepare_record(entity, record, id_generator).await?)
        }
        Payload::Batch(mut records) => {
            if let Some(id_generator) = id_generator {
                if !records.is_empty() {
                    assign_batch_identifiers(entity, &mut records, id_generator).await?;
                }
            }
            let mut prepared = Vec::with_capacity(records.len());
            for record in records {
                prepared.push(prepare_record(entity, record, None).await?);
            }
            PreparedValues::Batch(prepared)
        }
    };

    tracing::debug!(
        entity = %entity.name,
        kind = ?kind,
        records = prepared.len(),
        "prepared values"
    );
    Ok(prepared)
}

async fn assign_batch_identifiers(
    entity: &EntityInfo,
    records: &mut [Record],
    id_generator: &dyn IdGenerator,
) -> Result<(), Error> {
    let identifiers = id_generator.generate_batch(records.len()).await?;
    if identifiers.len() != records.len() {
        return Err(IdGenerationError(format!(
            "requested {} identifiers, got {}",
            records.len(),
            identifiers.len()
        ))
        .into());
    }
    for (record, identifier) in records.iter_mut().zip(identifiers) {
        if !record.contains_key(&entity.primary_key) {
            record.insert(entity.primary_key.clone(), identifier);
        }
    }
    Ok(())
}

/// Keep the declared fields of a record, in declaration order. An explicit `null` is kept.
async fn prepare_record(
    entity: &EntityInfo,
    mut record: Record,
    id_generator: Option<&dyn IdGenerator>,
) -> Result<Record, Error> {
    let mut prepared = Record::new();
    for name in entity.fields.keys() {
        if let Some(value) = record.remove(name) {
            prepared.insert(name.clone(), value);
        } else if *name == entity.primary_key {
            if let Some(id_generator) = id_generator {
                prepared.insert(name.clone(), id_generator.generate().await?);
            }
        }
    }
    for unknown in record.keys() {
        tracing::debug!(entity = %entity.name, field = %unknown, "dropping undeclared field");
    }
    Ok(prepared)
}

/// Pair each prepared record of an update with the primary key of the record it updates.
///
/// A single record is keyed by the route key when there is one, otherwise by its own primary
/// key. Batch records are keyed by their own primary keys. The primary key is removed from the
/// values: updates never change it.
pub fn resolve_update_keys(
    entity: &EntityInfo,
    prepared: PreparedValues,
    route_key: Option<&str>,
) -> Result<Vec<(Record, serde_json::Value)>, Error> {
    match prepared {
        PreparedValues::Single(mut record) => {
            let own_key = take_key(entity, &mut record);
            let key = match route_key {
                Some(route_key) => Some(coerce_key(entity, route_key)),
                None => own_key,
            }
            .ok_or_else(|| Error::MissingPrimaryKey(entity.name.clone()))?;
            Ok(vec![(record, key)])
        }
        PreparedValues::Batch(records) => records
            .into_iter()
            .map(|mut record| {
                let key = take_key(entity, &mut record)
                    .ok_or_else(|| Error::MissingPrimaryKey(entity.name.clone()))?;
                Ok((record, key))
            })
            .collect(),
    }
}

/// The JSON form of a primary key given as text, such as a route segment.
/// A numeric key that does not parse becomes `null`, which matches no record.
pub fn coerce_key(entity: &EntityInfo, raw: &str) -> serde_json::Value {
    match entity.primary_key_field() {
        Some(field) => values::coerce(raw, field.r#type).to_json(),
        None => serde_json::Value::String(raw.to_string()),
    }
}

fn take_key(entity: &EntityInfo, record: &mut Record) -> Option<serde_json::Value> {
    record
        .remove(&entity.primary_key)
        .filter(|key| !key.is_null())
}
