use axum::{extract::State, Json};

use crate::{
    error::ServerError,
    extract::{Entity, Options},
    mutation,
    state::ServerState,
};

/// Delete the records matching the conditions of the query string.
pub async fn delete_records(
    State(state): State<ServerState>,
    Entity(entity): Entity,
    Options(options): Options,
) -> Result<Json<&'static str>, ServerError> {
    mutation::delete(&state, &entity, options, None).await?;
    Ok(Json("ok"))
}
