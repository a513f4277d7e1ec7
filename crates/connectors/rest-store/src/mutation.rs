//! Write requests: prepare the body into values and hand them to the executor.

use tracing::{info_span, Instrument};

use query_engine_metadata::metadata::EntityInfo;
use query_engine_translation::translation::mutation::{
    self, MutationKind, Payload, PreparedValues,
};
use query_engine_translation::translation::query::RequestOptions;

use crate::error::ServerError;
use crate::query::plan_query;
use crate::state::ServerState;

/// Create one record or a batch of them. Returns the created key, or the keys of the batch.
pub async fn create(
    state: &ServerState,
    entity: &EntityInfo,
    payload: Payload,
) -> Result<serde_json::Value, ServerError> {
    let prepared = mutation::prepare_values(
        entity,
        payload,
        MutationKind::Create,
        state.id_generator(&entity.name),
    )
    .instrument(info_span!("Prepare values", entity = %entity.name))
    .await?;

    let created = async {
        match prepared {
            PreparedValues::Single(record) => state.executor.create(entity, record).await,
            PreparedValues::Batch(records) => state
                .executor
                .create_batch(entity, records)
                .await
                .map(serde_json::Value::from),
        }
    }
    .instrument(info_span!("Execute mutation", entity = %entity.name))
    .await?;

    state.metrics.mutation_total.inc();

    Ok(created)
}

/// Update one record or a batch of them, returning how many records were updated.
///
/// A single record is keyed by the route key when there is one. Otherwise every record must
/// carry its own primary key.
pub async fn update(
    state: &ServerState,
    entity: &EntityInfo,
    payload: Payload,
    route_key: Option<&str>,
) -> Result<u64, ServerError> {
    let keyed = async {
        let prepared =
            mutation::prepare_values(entity, payload, MutationKind::Update, None).await?;
        mutation::resolve_update_keys(entity, prepared, route_key)
    }
    .instrument(info_span!("Prepare values", entity = %entity.name))
    .await?;

    let mut updated = 0;
    for (record, key) in keyed {
        updated += state
            .executor
            .update(entity, record, &key)
            .instrument(info_span!("Execute mutation", entity = %entity.name))
            .await?;
    }

    state.metrics.mutation_total.inc();

    Ok(updated)
}

/// Delete the records matching the conditions of the request, and the route key when there is
/// one. Returns how many records were deleted.
pub async fn delete(
    state: &ServerState,
    entity: &EntityInfo,
    options: RequestOptions,
    route_key: Option<String>,
) -> Result<u64, ServerError> {
    mutation::check_removable(entity)?;

    let options = RequestOptions {
        key: route_key,
        ..options
    };
    let plan = plan_query(state, entity, &options).await?;

    let deleted = state
        .executor
        .delete(&plan)
        .instrument(info_span!("Execute mutation", entity = %entity.name))
        .await?;

    state.metrics.mutation_total.inc();

    Ok(deleted)
}
