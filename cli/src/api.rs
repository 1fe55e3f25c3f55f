//! HTTP client for the node persistence API.
//!
//! Thin typed wrapper over the server's REST contract. Every call is a
//! single request/response; batching and retry policy belong to the
//! caller.

use chart::doc::{NewNode, Node, NodeId, PartialNode};
use reqwest::{Response, StatusCode};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status} for {method} {path}")]
    Status { method: &'static str, path: String, status: StatusCode },
}

pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn ensure_success(method: &'static str, path: &str, resp: Response) -> Result<Response, ApiError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(ApiError::Status { method, path: path.to_string(), status: resp.status() })
        }
    }

    /// `GET /api/nodes` — the full snapshot, in stable sibling order.
    ///
    /// # Errors
    ///
    /// Transport failures and non-2xx statuses.
    pub async fn list_nodes(&self) -> Result<Vec<Node>, ApiError> {
        let path = "/api/nodes";
        let resp = self.http.get(self.url(path)).send().await?;
        let resp = Self::ensure_success("GET", path, resp)?;
        Ok(resp.json().await?)
    }

    /// `POST /api/nodes` — create a node; the server assigns the id.
    ///
    /// # Errors
    ///
    /// Transport failures and non-2xx statuses.
    pub async fn create_node(&self, new: &NewNode) -> Result<Node, ApiError> {
        let path = "/api/nodes";
        let resp = self.http.post(self.url(path)).json(new).send().await?;
        let resp = Self::ensure_success("POST", path, resp)?;
        Ok(resp.json().await?)
    }

    /// `PATCH /api/nodes/:id` — sparse update (rename, kind, position).
    ///
    /// # Errors
    ///
    /// Transport failures and non-2xx statuses.
    pub async fn update_node(&self, id: &NodeId, fields: &PartialNode) -> Result<Node, ApiError> {
        let path = format!("/api/nodes/{id}");
        let resp = self.http.patch(self.url(&path)).json(fields).send().await?;
        let resp = Self::ensure_success("PATCH", &path, resp)?;
        Ok(resp.json().await?)
    }

    /// `DELETE /api/nodes/:id` — idempotent delete.
    ///
    /// # Errors
    ///
    /// Transport failures and non-2xx statuses.
    pub async fn delete_node(&self, id: &NodeId) -> Result<(), ApiError> {
        let path = format!("/api/nodes/{id}");
        let resp = self.http.delete(self.url(&path)).send().await?;
        Self::ensure_success("DELETE", &path, resp)?;
        Ok(())
    }
}
