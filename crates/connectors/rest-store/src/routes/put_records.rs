use axum::{extract::rejection::JsonRejection, extract::State, Json};

use query_engine_translation::translation::mutation::Payload;

use crate::{error::ServerError, extract::Entity, mutation, state::ServerState};

/// Update records by the primary keys they carry.
pub async fn put_records(
    State(state): State<ServerState>,
    Entity(entity): Entity,
    payload: Result<Json<Payload>, JsonRejection>,
) -> Result<Json<&'static str>, ServerError> {
    let Json(payload) = payload.map_err(|err| ServerError::InvalidRequest(err.body_text()))?;
    mutation::update(&state, &entity, payload, None).await?;
    Ok(Json("ok"))
}
