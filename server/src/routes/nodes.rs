//! Node CRUD routes.

#[cfg(test)]
#[path = "nodes_test.rs"]
mod nodes_test;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

use crate::services::node::{self, CreateNode, NodeError, UpdateNode};
use crate::state::{AppState, NodeRecord};

fn node_error_to_status(err: &NodeError) -> StatusCode {
    match err {
        NodeError::NotFound(_) => StatusCode::NOT_FOUND,
        NodeError::EmptyName | NodeError::UnknownKind(_) | NodeError::DepthMismatch { .. } => {
            StatusCode::BAD_REQUEST
        }
        NodeError::RootExists | NodeError::ParentNotFound(_) => StatusCode::CONFLICT,
        NodeError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn reject(err: &NodeError) -> StatusCode {
    let status = node_error_to_status(err);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "node request failed");
    } else {
        tracing::debug!(error = %err, "node request rejected");
    }
    status
}

/// `GET /api/nodes` — full snapshot in stable sibling order.
pub async fn list_nodes(
    State(state): State<AppState>,
) -> Result<Json<Vec<NodeRecord>>, StatusCode> {
    let rows = node::list_nodes(&state.pool).await.map_err(|e| reject(&e))?;
    Ok(Json(rows))
}

/// `GET /api/nodes/:id` — fetch one node.
pub async fn get_node(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<NodeRecord>, StatusCode> {
    let row = node::get_node(&state.pool, id).await.map_err(|e| reject(&e))?;
    Ok(Json(row))
}

/// `POST /api/nodes` — create a node; the id is assigned here.
pub async fn create_node(
    State(state): State<AppState>,
    Json(body): Json<CreateNode>,
) -> Result<(StatusCode, Json<NodeRecord>), StatusCode> {
    let row = node::create_node(&state.pool, &body).await.map_err(|e| reject(&e))?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `PATCH /api/nodes/:id` — sparse update (rename, kind, position).
pub async fn update_node(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateNode>,
) -> Result<Json<NodeRecord>, StatusCode> {
    let row = node::update_node(&state.pool, id, &body).await.map_err(|e| reject(&e))?;
    Ok(Json(row))
}

/// `DELETE /api/nodes/:id` — delete a row; idempotent.
pub async fn delete_node(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    node::delete_node(&state.pool, id).await.map_err(|e| reject(&e))?;
    Ok(Json(serde_json::json!({ "ok": true })))
}
