use axum::{extract::rejection::JsonRejection, extract::State, Json};

use query_engine_translation::translation::mutation::Payload;

use crate::{error::ServerError, extract::Entity, mutation, state::ServerState};

/// Create a record, or a batch of records when the body is a list.
pub async fn post_records(
    State(state): State<ServerState>,
    Entity(entity): Entity,
    payload: Result<Json<Payload>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let Json(payload) = payload.map_err(|err| ServerError::InvalidRequest(err.body_text()))?;
    let created = mutation::create(&state, &entity, payload).await?;
    Ok(Json(created))
}
