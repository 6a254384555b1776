//! HTTP request handlers for the viewer.
//!
//! Handlers fetch from the [`RecordStore`] and hand the result to a renderer.
//! Store errors are mapped at this boundary: a missing record is a 404, anything
//! else is logged and answered with a generic 500 so internal paths and parse
//! errors never reach the client.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use crate::error::StoreError;
use crate::render::{render_detail, render_index, render_json};
use crate::store::RecordStore;
use crate::utils::{detail_href, encode_id_segment};

pub const NOT_FOUND_BODY: &str = "Not found";
pub const INTERNAL_ERROR_BODY: &str = "Internal server error";

/// Application state shared across all handlers
pub struct AppState {
    pub store: RecordStore,
}

impl AppState {
    pub fn new(store: RecordStore) -> Arc<Self> {
        Arc::new(Self { store })
    }
}

#[derive(Debug, Error)]
pub enum RouteError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to encode record as JSON: {0}")]
    Encode(#[from] serde_json::Error),
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        match &self {
            RouteError::Store(err) if err.is_not_found() => {
                debug!(error = %err, "Record not found");
                (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response()
            }
            _ => {
                error!(error = %self, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response()
            }
        }
    }
}

/// `GET /` - index of every record in file order
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, RouteError> {
    let metas = state.store.list_metadata().await?;
    debug!(records = metas.len(), "Rendering index");
    Ok(Html(render_index(&metas)))
}

/// `GET /context/{id}` - permanent redirect to the trailing-slash form
///
/// The detail page links relative to its own directory, so it must only be
/// served from `/context/{id}/`.
pub async fn context_detail_redirect(Path(id): Path<String>) -> Redirect {
    Redirect::permanent(&detail_href(&id))
}

/// `GET /context/{id}/json` - permanent redirect to `/context/{id}/json/`
pub async fn context_json_redirect(Path(id): Path<String>) -> Redirect {
    Redirect::permanent(&format!("/context/{}/json/", encode_id_segment(&id)))
}

/// `GET /context/{id}/` - conversation view of one record
pub async fn context_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Html<String>, RouteError> {
    let record = state.store.find_by_id(&id).await?;
    Ok(Html(render_detail(&record)))
}

/// `GET /context/{id}/json/` - the raw record
pub async fn context_json(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, RouteError> {
    let record = state.store.find_by_id(&id).await?;
    Ok(Json(render_json(&record)?))
}
