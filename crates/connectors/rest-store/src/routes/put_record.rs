use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use query_engine_translation::translation::mutation::Payload;

use crate::{error::ServerError, extract::Entity, mutation, state::ServerState};

/// Update the record with the key of the route.
pub async fn put_record(
    State(state): State<ServerState>,
    Entity(entity): Entity,
    Path((_, id)): Path<(String, String)>,
    payload: Result<Json<Payload>, JsonRejection>,
) -> Result<Json<&'static str>, ServerError> {
    let Json(payload) = payload.map_err(|err| ServerError::InvalidRequest(err.body_text()))?;
    mutation::update(&state, &entity, payload, Some(&id)).await?;
    Ok(Json("ok"))
}
