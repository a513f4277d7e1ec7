//! The contract of a store that runs query plans and writes prepared value sets.

use async_trait::async_trait;

use query_engine_metadata::metadata::EntityInfo;
use query_engine_translation::translation::mutation::Record;
use query_engine_translation::translation::query::plan::QueryPlan;

use crate::error::Error;

/// A result row. Included associations are nested under their association name.
pub type Row = serde_json::Map<String, serde_json::Value>;

#[async_trait]
pub trait Executor: Send + Sync {
    /// Run a query plan.
    async fn find_all(&self, plan: &QueryPlan) -> Result<Vec<Row>, Error>;

    /// Run a query plan for a single row.
    async fn find_one(&self, plan: &QueryPlan) -> Result<Option<Row>, Error> {
        Ok(self.find_all(plan).await?.into_iter().next())
    }

    /// Insert a record, returning its primary key.
    async fn create(&self, entity: &EntityInfo, record: Record)
        -> Result<serde_json::Value, Error>;

    /// Insert all the records or none of them, returning their primary keys in order.
    async fn create_batch(
        &self,
        entity: &EntityInfo,
        records: Vec<Record>,
    ) -> Result<Vec<serde_json::Value>, Error>;

    /// Update the record with the given primary key, returning the number of updated records.
    async fn update(
        &self,
        entity: &EntityInfo,
        record: Record,
        key: &serde_json::Value,
    ) -> Result<u64, Error>;

    /// Delete the records matched by the root of a plan, returning how many there were.
    /// Selection, ordering, includes and pagination do not apply.
    async fn delete(&self, plan: &QueryPlan) -> Result<u64, Error>;
}
