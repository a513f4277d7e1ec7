use axum::{extract::State, Json};

use query_engine_execution::Row;

use crate::{
    error::ServerError,
    extract::{Entity, Options},
    query,
    state::ServerState,
};

pub async fn get_records(
    State(state): State<ServerState>,
    Entity(entity): Entity,
    Options(options): Options,
) -> Result<Json<Vec<Row>>, ServerError> {
    let rows = query::find_records(&state, &entity, options).await?;
    Ok(Json(rows))
}
