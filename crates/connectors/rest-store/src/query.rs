//! Read requests: compile the request options into a plan and run it.

use tracing::{info_span, Instrument};

use query_engine_execution::Row;
use query_engine_metadata::metadata::EntityInfo;
use query_engine_translation::translation::query::{self, plan::QueryPlan, RequestOptions};

use crate::error::ServerError;
use crate::state::ServerState;

/// Find the records of an entity matching the request options.
pub async fn find_records(
    state: &ServerState,
    entity: &EntityInfo,
    options: RequestOptions,
) -> Result<Vec<Row>, ServerError> {
    let plan = plan_query(state, entity, &options).await?;

    let rows = state
        .executor
        .find_all(&plan)
        .instrument(info_span!("Execute query", entity = %entity.name))
        .await?;

    // assuming query succeeded, increment counter
    state.metrics.query_total.inc();

    Ok(rows.into_iter().map(strip_nulls).collect())
}

/// Find the record of an entity with a key. Conditions still apply, pagination does not.
pub async fn find_record(
    state: &ServerState,
    entity: &EntityInfo,
    options: RequestOptions,
    key: String,
) -> Result<Row, ServerError> {
    let options = RequestOptions {
        key: Some(key.clone()),
        ..options
    };
    let plan = plan_query(state, entity, &options).await?;

    let row = state
        .executor
        .find_one(&plan)
        .instrument(info_span!("Execute query", entity = %entity.name))
        .await?;

    state.metrics.query_total.inc();

    row.map(strip_nulls).ok_or(ServerError::RecordNotFound {
        entity: entity.name.clone(),
        key,
    })
}

pub(crate) async fn plan_query(
    state: &ServerState,
    entity: &EntityInfo,
    options: &RequestOptions,
) -> Result<QueryPlan, ServerError> {
    async { query::translate(&state.configuration.metadata, &entity.name, options) }
        .instrument(info_span!("Plan query", entity = %entity.name))
        .await
        .map_err(ServerError::from)
}

/// Drop the null members of a row, including those of its included rows.
pub fn strip_nulls(row: Row) -> Row {
    row.into_iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(name, value)| (name, strip_value(value)))
        .collect()
}

fn strip_value(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(row) => serde_json::Value::Object(strip_nulls(row)),
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.into_iter().map(strip_value).collect())
        }
        other => other,
    }
}
