//! REST endpoints for the tools collection.
//!
//! Each handler makes exactly one store call. Response envelopes differ per
//! route and are part of the public contract:
//!
//! | Route            | Success body          |
//! |------------------|-----------------------|
//! | `GET /`          | `{count, data: [..]}` |
//! | `GET /{id}`      | `{data}`              |
//! | `POST /`         | raw tool, 201         |
//! | `PUT /{id}`      | `{data}`              |
//! | `DELETE /{id}`   | `{data}`              |

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::model::{NewTool, Tool, ToolPatch};
use crate::error::ApiError;
use crate::store::ToolStore;

/// Shared state for the tool routes.
#[derive(Clone)]
pub struct ToolState {
    pub store: Arc<dyn ToolStore>,
}

impl ToolState {
    pub fn new(store: Arc<dyn ToolStore>) -> Self {
        Self { store }
    }
}

/// `{count, data}` wrapper used by the list route.
#[derive(Debug, Serialize)]
struct ListEnvelope {
    count: usize,
    data: Vec<Tool>,
}

/// `{data}` wrapper used by get, update, and delete.
#[derive(Debug, Serialize)]
struct DataEnvelope {
    data: Tool,
}

/// Build the tool router. Paths are relative to wherever it is mounted.
pub fn tool_routes(state: ToolState) -> Router {
    Router::new()
        .route("/", get(list_tools).post(create_tool))
        .route("/{id}", get(get_tool).put(update_tool).delete(delete_tool))
        .with_state(state)
}

/// Unwrap a JSON body.
///
/// A request without a JSON content type is read as an empty object, so it
/// reaches the create gate or applies as an empty update. Malformed JSON is a
/// 400 `{message}` carrying the rejection text.
fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(JsonRejection::MissingJsonContentType(_)) => {
            debug!("Request body has no JSON content type; treating as empty");
            Ok(Value::Object(Map::new()))
        }
        Err(rejection) => {
            debug!(error = %rejection, "Rejected request body");
            Err(ApiError::BadRequest(rejection.body_text()))
        }
    }
}

/// GET /
async fn list_tools(State(state): State<ToolState>) -> Result<impl IntoResponse, ApiError> {
    let tools = state.store.find_all().await?;
    Ok(Json(ListEnvelope {
        count: tools.len(),
        data: tools,
    }))
}

/// GET /{id}
async fn get_tool(
    State(state): State<ToolState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let tool = state.store.find_by_id(&id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(DataEnvelope { data: tool }))
}

/// POST /
///
/// Responds with the bare tool rather than a `{data}` envelope.
async fn create_tool(
    State(state): State<ToolState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let new_tool = NewTool::from_body(&json_body(body)?)?;
    let tool = state.store.create(new_tool).await?;
    info!(id = %tool.id, name = %tool.name, "Tool created");
    Ok((StatusCode::CREATED, Json(tool)))
}

/// PUT /{id}
///
/// No field validation: any subset of fields is applied as given.
async fn update_tool(
    State(state): State<ToolState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let patch = ToolPatch::from_body(json_body(body)?)?;
    if patch.is_empty() {
        debug!(id = %id, "Update carries no known fields");
    }
    let tool = state
        .store
        .update_by_id(&id, patch)
        .await?
        .ok_or(ApiError::NotFound)?;
    info!(id = %tool.id, "Tool updated");
    Ok(Json(DataEnvelope { data: tool }))
}

/// DELETE /{id}
///
/// Returns the record as it was immediately before deletion.
async fn delete_tool(
    State(state): State<ToolState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let tool = state
        .store
        .delete_by_id(&id)
        .await?
        .ok_or(ApiError::NotFound)?;
    info!(id = %tool.id, "Tool deleted");
    Ok(Json(DataEnvelope { data: tool }))
}
