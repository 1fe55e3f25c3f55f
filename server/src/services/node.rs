//! Node service — validation and CRUD for org-chart node records.
//!
//! Every structural rule the chart depends on is checked here before a
//! row changes: names must be non-empty, kinds must be known, at most one
//! depth-1 root may exist, and a child's depth must sit exactly one level
//! below its parent. Reads return rows in `(created_at, id)` order — the
//! snapshot order is the sibling order, so it must be stable across
//! reloads.

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::state::NodeRecord;

const NODE_COLUMNS: &str = "id, name, kind, depth, parent_id, x, y";

#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("node not found: {0}")]
    NotFound(Uuid),
    #[error("node name must not be empty")]
    EmptyName,
    #[error("unknown relationship kind: {0}")]
    UnknownKind(String),
    #[error("a root node already exists")]
    RootExists,
    #[error("parent not found: {0}")]
    ParentNotFound(Uuid),
    #[error("depth {depth} is invalid here; expected {expected}")]
    DepthMismatch { depth: i32, expected: i32 },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Fields for a node that does not exist yet.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNode {
    pub name: String,
    pub kind: String,
    pub depth: i32,
    pub parent_id: Option<Uuid>,
}

/// Sparse update. Only present fields are applied; structure
/// (`depth`, `parent_id`) is fixed at creation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNode {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

/// Trimmed, non-empty name or `EmptyName`.
fn validate_name(name: &str) -> Result<&str, NodeError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(NodeError::EmptyName);
    }
    Ok(trimmed)
}

/// A known relationship kind or `UnknownKind`.
fn validate_kind(kind: &str) -> Result<&str, NodeError> {
    match kind {
        "direct" | "advisory" => Ok(kind),
        other => Err(NodeError::UnknownKind(other.to_string())),
    }
}

/// Check a create request against tree invariants. `parent_depth` is the
/// looked-up depth of the requested parent (None when no parent was
/// requested); `root_exists` is whether a depth-1 row is already present.
fn validate_create(
    create: &CreateNode,
    parent_depth: Option<i32>,
    root_exists: bool,
) -> Result<(), NodeError> {
    validate_name(&create.name)?;
    validate_kind(&create.kind)?;
    match (create.parent_id, parent_depth) {
        (None, _) => {
            if create.depth != 1 {
                return Err(NodeError::DepthMismatch { depth: create.depth, expected: 1 });
            }
            if root_exists {
                return Err(NodeError::RootExists);
            }
        }
        (Some(parent_id), None) => return Err(NodeError::ParentNotFound(parent_id)),
        (Some(_), Some(parent_depth)) => {
            if create.depth != parent_depth + 1 {
                return Err(NodeError::DepthMismatch {
                    depth: create.depth,
                    expected: parent_depth + 1,
                });
            }
        }
    }
    Ok(())
}

/// Merge a sparse update onto an existing record, validating the
/// incoming fields.
fn merge_update(existing: &NodeRecord, update: &UpdateNode) -> Result<NodeRecord, NodeError> {
    let mut merged = existing.clone();
    if let Some(ref name) = update.name {
        merged.name = validate_name(name)?.to_string();
    }
    if let Some(ref kind) = update.kind {
        merged.kind = validate_kind(kind)?.to_string();
    }
    if let Some(x) = update.x {
        merged.x = x;
    }
    if let Some(y) = update.y {
        merged.y = y;
    }
    Ok(merged)
}

/// Full snapshot in `(created_at, id)` order.
///
/// # Errors
///
/// `Database` on query failure.
pub async fn list_nodes(pool: &PgPool) -> Result<Vec<NodeRecord>, NodeError> {
    let rows = sqlx::query_as::<_, NodeRecord>(&format!(
        "SELECT {NODE_COLUMNS} FROM nodes ORDER BY created_at, id"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Fetch one node.
///
/// # Errors
///
/// `NotFound` if the id has no row.
pub async fn get_node(pool: &PgPool, id: Uuid) -> Result<NodeRecord, NodeError> {
    sqlx::query_as::<_, NodeRecord>(&format!("SELECT {NODE_COLUMNS} FROM nodes WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(NodeError::NotFound(id))
}

/// Create a node with a freshly assigned id. Positions start at the
/// origin; the client's layout pass overwrites them immediately.
///
/// # Errors
///
/// Validation errors as per [`validate_create`]; `Database` on failure.
pub async fn create_node(pool: &PgPool, create: &CreateNode) -> Result<NodeRecord, NodeError> {
    let parent_depth = match create.parent_id {
        Some(parent_id) => {
            sqlx::query_scalar::<_, i32>("SELECT depth FROM nodes WHERE id = $1")
                .bind(parent_id)
                .fetch_optional(pool)
                .await?
        }
        None => None,
    };
    let root_exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM nodes WHERE depth = 1)")
            .fetch_one(pool)
            .await?;

    validate_create(create, parent_depth, root_exists)?;

    let record = NodeRecord {
        id: Uuid::new_v4(),
        name: create.name.trim().to_string(),
        kind: create.kind.clone(),
        depth: create.depth,
        parent_id: create.parent_id,
        x: 0.0,
        y: 0.0,
    };
    sqlx::query(
        "INSERT INTO nodes (id, name, kind, depth, parent_id, x, y) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(record.id)
    .bind(&record.name)
    .bind(&record.kind)
    .bind(record.depth)
    .bind(record.parent_id)
    .bind(record.x)
    .bind(record.y)
    .execute(pool)
    .await?;

    Ok(record)
}

/// Apply a sparse update and return the updated record.
///
/// # Errors
///
/// `NotFound` for an unknown id; validation errors for bad fields;
/// `Database` on failure.
pub async fn update_node(
    pool: &PgPool,
    id: Uuid,
    update: &UpdateNode,
) -> Result<NodeRecord, NodeError> {
    let existing = get_node(pool, id).await?;
    let merged = merge_update(&existing, update)?;

    sqlx::query("UPDATE nodes SET name = $2, kind = $3, x = $4, y = $5 WHERE id = $1")
        .bind(merged.id)
        .bind(&merged.name)
        .bind(&merged.kind)
        .bind(merged.x)
        .bind(merged.y)
        .execute(pool)
        .await?;

    Ok(merged)
}

/// Delete a node row. Idempotent: deleting an id that is already gone
/// succeeds, so an unordered client-side subtree batch never trips over
/// its own ordering.
///
/// # Errors
///
/// `Database` on failure.
pub async fn delete_node(pool: &PgPool, id: Uuid) -> Result<(), NodeError> {
    let result = sqlx::query("DELETE FROM nodes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        tracing::debug!(%id, "delete for an absent node");
    }
    Ok(())
}
