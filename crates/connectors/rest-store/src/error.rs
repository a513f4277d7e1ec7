//! Errors returned by the HTTP handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use query_engine_translation::translation::error::Error as TranslationError;

#[derive(Debug)]
pub enum ServerError {
    /// No entity is served under the path.
    EntityNotFound(String),
    /// No record has the key.
    RecordNotFound { entity: String, key: String },
    /// The query string or body could not be read.
    InvalidRequest(String),
    MissingPrimaryKey(String),
    MethodNotAllowed(String),
    IdentifierGeneration(String),
    Execution(String),
}

#[derive(Serialize)]
struct JsonErrorResponse {
    message: String,
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::EntityNotFound(_) | ServerError::RecordNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            ServerError::InvalidRequest(_) | ServerError::MissingPrimaryKey(_) => {
                StatusCode::BAD_REQUEST
            }
            ServerError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ServerError::IdentifierGeneration(_) | ServerError::Execution(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn message(&self) -> String {
        match self {
            ServerError::EntityNotFound(path) => format!("No entity is served at '/{path}'."),
            ServerError::RecordNotFound { entity, key } => {
                format!("No record of entity '{entity}' has the key '{key}'.")
            }
            ServerError::InvalidRequest(msg) => format!("Invalid request: {msg}"),
            ServerError::MissingPrimaryKey(entity) => {
                format!("No primary key value supplied for entity '{entity}'.")
            }
            ServerError::MethodNotAllowed(msg)
            | ServerError::IdentifierGeneration(msg)
            | ServerError::Execution(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!(
                meta.signal_type = "log",
                event.domain = "rest-store",
                event.name = "Request error",
                name = "Request error",
                body = %message,
                error = true,
            );
        } else {
            tracing::info!(status = %status, message = %message, "rejecting request");
        }

        (status, Json(JsonErrorResponse { message })).into_response()
    }
}

impl From<TranslationError> for ServerError {
    fn from(value: TranslationError) -> Self {
        match value {
            TranslationError::EntityNotFound(entity) => ServerError::EntityNotFound(entity),
            TranslationError::MissingPrimaryKey(entity) => ServerError::MissingPrimaryKey(entity),
            TranslationError::NotSupported(_) => ServerError::MethodNotAllowed(value.to_string()),
            TranslationError::IdentifierGeneration(_) => {
                ServerError::IdentifierGeneration(value.to_string())
            }
        }
    }
}

impl From<query_engine_execution::Error> for ServerError {
    fn from(value: query_engine_execution::Error) -> Self {
        ServerError::Execution(value.to_string())
    }
}
