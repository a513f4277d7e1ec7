use std::collections::HashMap;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query},
    http::{request::Parts, Method},
};

use query_engine_metadata::metadata::{EntityInfo, HttpMethod};
use query_engine_translation::translation::query::RequestOptions;

use super::{error::ServerError, query_params, state::ServerState};

/// The entity served under the first path segment.
pub struct Entity(pub EntityInfo);

/// The query string of a request, read as request options.
pub struct Options(pub RequestOptions);

#[async_trait]
impl FromRequestParts<ServerState> for Entity {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let Path(segments) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|err| ServerError::InvalidRequest(err.body_text()))?;
        let path = segments.get("path").map(String::as_str).unwrap_or_default();

        let entity = state
            .configuration
            .metadata
            .lookup_entity_by_path(path)
            .ok_or_else(|| ServerError::EntityNotFound(path.to_string()))?;

        if let Some(method) = http_method(&parts.method) {
            if !entity.allows_method(method) {
                return Err(ServerError::MethodNotAllowed(format!(
                    "Entity '{}' is not served with {method}.",
                    entity.name
                )));
            }
        }

        Ok(Entity(entity.clone()))
    }
}

fn http_method(method: &Method) -> Option<HttpMethod> {
    match *method {
        Method::GET | Method::HEAD => Some(HttpMethod::Get),
        Method::POST => Some(HttpMethod::Post),
        Method::PUT => Some(HttpMethod::Put),
        Method::PATCH => Some(HttpMethod::Patch),
        Method::DELETE => Some(HttpMethod::Delete),
        _ => None,
    }
}

#[async_trait]
impl FromRequestParts<ServerState> for Options {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // pairs, so that repeated keys are not rejected
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|err| ServerError::InvalidRequest(err.body_text()))?;

        Ok(Options(query_params::request_options(
            pairs,
            &state.configuration,
        )))
    }
}
