use axum::{extract::State, http::header, response::IntoResponse};

use crate::{error::ServerError, state::ServerState};

/// The registered counters, in the Prometheus text format.
pub async fn get_metrics(State(state): State<ServerState>) -> Result<impl IntoResponse, ServerError> {
    let body = prometheus::TextEncoder::new()
        .encode_to_string(&state.metrics_registry.gather())
        .map_err(|err| ServerError::Execution(err.to_string()))?;

    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body))
}
