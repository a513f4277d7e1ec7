use axum::{
    extract::{Path, State},
    Json,
};

use query_engine_execution::Row;

use crate::{
    error::ServerError,
    extract::{Entity, Options},
    query,
    state::ServerState,
};

pub async fn get_record(
    State(state): State<ServerState>,
    Entity(entity): Entity,
    Path((_, id)): Path<(String, String)>,
    Options(options): Options,
) -> Result<Json<Row>, ServerError> {
    let row = query::find_record(&state, &entity, options, id).await?;
    Ok(Json(row))
}
