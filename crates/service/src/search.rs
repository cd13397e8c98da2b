//! Best-effort indexing into the configured search engine.
//!
//! Writes and deletes are mirrored into a document index so the surrounding
//! application can query workspace contents. Indexing never fails a storage
//! operation; trouble is logged and the request proceeds.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use url::Url;

const INDEX_NAME: &str = "wsio-objects";

/// Document describing one stored object.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectDocument {
    /// Logical workspace path.
    pub path: String,
    pub node: String,
    pub bucket: String,
    pub size: u64,
    pub indexed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    nodes: Vec<Url>,
}

impl SearchClient {
    pub fn new(nodes: Vec<Url>) -> Self {
        Self {
            http: reqwest::Client::new(),
            nodes,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// Stable document id for a logical path on a node.
    fn document_id(node: &str, path: &str) -> String {
        hex::encode(Sha256::digest(format!("{}\n{}", node, path).as_bytes()))
    }

    fn document_url(base: &Url, id: &str) -> Option<Url> {
        base.join(&format!("{}/_doc/{}", INDEX_NAME, id)).ok()
    }

    /// Index `doc`, trying configured nodes in order until one accepts it.
    pub async fn index_object(&self, doc: &ObjectDocument) {
        let id = Self::document_id(&doc.node, &doc.path);
        for base in &self.nodes {
            let Some(url) = Self::document_url(base, &id) else {
                continue;
            };
            match self.http.put(url).json(doc).send().await {
                Ok(response) if response.status().is_success() => return,
                Ok(response) => {
                    tracing::warn!(
                        search_node = %base,
                        status = %response.status(),
                        path = %doc.path,
                        "search node rejected document"
                    );
                }
                Err(e) => {
                    tracing::warn!(search_node = %base, error = %e, "search node unreachable");
                }
            }
        }
        if self.is_enabled() {
            tracing::warn!(path = %doc.path, "object not indexed, no search node accepted it");
        }
    }

    /// Drop the document for a deleted object.
    pub async fn delete_object(&self, node: &str, path: &str) {
        let id = Self::document_id(node, path);
        for base in &self.nodes {
            let Some(url) = Self::document_url(base, &id) else {
                continue;
            };
            match self.http.delete(url).send().await {
                // 404 means it was never indexed; that's fine too.
                Ok(response)
                    if response.status().is_success()
                        || response.status() == reqwest::StatusCode::NOT_FOUND =>
                {
                    return
                }
                Ok(response) => {
                    tracing::warn!(
                        search_node = %base,
                        status = %response.status(),
                        path,
                        "search node rejected delete"
                    );
                }
                Err(e) => {
                    tracing::warn!(search_node = %base, error = %e, "search node unreachable");
                }
            }
        }
    }
}
