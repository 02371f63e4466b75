//! `/configs` handlers.
//!
//! Thin adapters: extract parameters, call the workflow, map the result to a
//! status code. All decisions live in [`ConfigService`](crate::workflow::ConfigService).

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::http::server::AppState;
use crate::workflow::WorkflowError;

/// Content type of stored documents.
pub const YAML_CONTENT_TYPE: &str = "application/x-yaml";

/// `?name=` query parameter for save and delete.
#[derive(Debug, Deserialize)]
pub struct NameParam {
    pub name: Option<String>,
}

impl NameParam {
    fn into_name(self) -> Option<String> {
        self.name.filter(|n| !n.is_empty())
    }
}

/// `GET /configs`
pub async fn list_configs(State(state): State<AppState>) -> Response {
    match state.service.list().await {
        Ok(names) => (StatusCode::OK, Json(names)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list configs");
            (StatusCode::INTERNAL_SERVER_ERROR, "error fetching all keys").into_response()
        }
    }
}

/// `GET /configs/{name}`
pub async fn get_config(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    match state.service.get(&name).await {
        Ok(document) => (StatusCode::OK, [(header::CONTENT_TYPE, YAML_CONTENT_TYPE)], document).into_response(),
        Err(WorkflowError::ConfigNotFound(_)) => (StatusCode::NOT_FOUND, "Config not found").into_response(),
        Err(e) => {
            tracing::error!(config = %name, error = %e, "Failed to fetch config");
            (StatusCode::INTERNAL_SERVER_ERROR, "error fetching config").into_response()
        }
    }
}

/// `POST /configs?name=<name>`
///
/// Non-interactive: an existing name is an error, never an overwrite.
pub async fn save_config(
    State(state): State<AppState>,
    Query(params): Query<NameParam>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let Some(name) = params.into_name() else {
        return (StatusCode::BAD_REQUEST, "missing config name").into_response();
    };

    let body = match body {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(config = %name, error = %e, "Unreadable request body");
            return (StatusCode::BAD_REQUEST, "invalid body").into_response();
        }
    };

    match state.service.create(&name, &body).await {
        Ok(_) => StatusCode::CREATED.into_response(),
        Err(e) => {
            tracing::warn!(config = %name, error = %e, "Save failed");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("save failed: {}", e)).into_response()
        }
    }
}

/// `DELETE /configs?name=<name>`
pub async fn delete_config(State(state): State<AppState>, Query(params): Query<NameParam>) -> Response {
    let Some(name) = params.into_name() else {
        return (StatusCode::BAD_REQUEST, "missing config name").into_response();
    };

    match state.service.delete(&name).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e @ WorkflowError::ConfigNotFound(_)) => {
            tracing::warn!(config = %name, "Delete of unknown config");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
        Err(e) => {
            tracing::error!(config = %name, error = %e, "Delete failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "delete failed").into_response()
        }
    }
}
