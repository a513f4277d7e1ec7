use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::ServerError,
    extract::{Entity, Options},
    mutation,
    state::ServerState,
};

pub async fn delete_record(
    State(state): State<ServerState>,
    Entity(entity): Entity,
    Path((_, id)): Path<(String, String)>,
    Options(options): Options,
) -> Result<Json<&'static str>, ServerError> {
    mutation::delete(&state, &entity, options, Some(id)).await?;
    Ok(Json("ok"))
}
