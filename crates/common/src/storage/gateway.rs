//! Credential-aware access to resolved backends.
//!
//! [`NodeGateway`] owns the client and session caches and is the single path
//! every storage operation takes after resolution. Cloud-backed nodes get a
//! valid session first; an auth-rejected call invalidates the session,
//! re-authenticates once, and retries the call once. A second rejection (or
//! a failed exchange) surfaces as [`AccessError::CredentialExchange`].

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use parking_lot::RwLock;
use url::Url;

use super::{ObjectInfo, Storage, StorageError};
use crate::creds::{CredentialCache, CredentialProvider};
use crate::node::Node;

#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("credential exchange failed for node '{node}': {detail}")]
    CredentialExchange { node: String, detail: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

struct CachedStore {
    /// Access key the client was built with; rotated sessions invalidate.
    session_key: Option<String>,
    storage: Storage,
}

/// Gateway from resolved (node, bucket) pairs to live backend clients.
pub struct NodeGateway {
    creds: CredentialCache,
    stores: RwLock<HashMap<String, CachedStore>>,
}

impl NodeGateway {
    pub fn new(provider: Arc<dyn CredentialProvider>) -> Self {
        Self {
            creds: CredentialCache::new(provider),
            stores: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, node: &Node, bucket: &str, key: &str) -> Result<Bytes, AccessError> {
        self.with_store(node, bucket, |store| async move { store.get(key).await })
            .await
    }

    pub async fn put(
        &self,
        node: &Node,
        bucket: &str,
        key: &str,
        data: Bytes,
    ) -> Result<(), AccessError> {
        self.with_store(node, bucket, |store| {
            let data = data.clone();
            async move { store.put(key, data).await }
        })
        .await
    }

    pub async fn list(
        &self,
        node: &Node,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<ObjectInfo>, AccessError> {
        self.with_store(node, bucket, |store| async move { store.list(prefix).await })
            .await
    }

    pub async fn delete(&self, node: &Node, bucket: &str, key: &str) -> Result<(), AccessError> {
        self.with_store(node, bucket, |store| async move { store.delete(key).await })
            .await
    }

    pub async fn signed_url(
        &self,
        node: &Node,
        bucket: &str,
        method: http::Method,
        key: &str,
        expires_in: Duration,
    ) -> Result<Url, AccessError> {
        self.with_store(node, bucket, |store| {
            let method = method.clone();
            async move { store.signed_url(method, key, expires_in).await }
        })
        .await
    }

    /// Run one storage call with valid credentials, retrying exactly once
    /// after a fresh exchange if the backend rejects the session.
    async fn with_store<T, F, Fut>(
        &self,
        node: &Node,
        bucket: &str,
        f: F,
    ) -> Result<T, AccessError>
    where
        F: Fn(Storage) -> Fut,
        Fut: Future<Output = Result<T, StorageError>>,
    {
        let store = self.store_for(node, bucket, false).await?;
        match f(store).await {
            Ok(value) => Ok(value),
            Err(e) if e.is_auth_rejected() && node.is_cloud() => {
                tracing::debug!(
                    node = %node.name,
                    bucket,
                    "session rejected by backend, re-authenticating"
                );
                let store = self.store_for(node, bucket, true).await?;
                f(store).await.map_err(|retry_err| {
                    if retry_err.is_auth_rejected() {
                        AccessError::CredentialExchange {
                            node: node.name.clone(),
                            detail: retry_err.to_string(),
                        }
                    } else {
                        AccessError::Storage(retry_err)
                    }
                })
            }
            Err(e) => Err(AccessError::Storage(e)),
        }
    }

    /// Get (or build) the backend client for `(node, bucket)`.
    ///
    /// `fresh_session` forces a new credential exchange for cloud nodes and
    /// is only set on the retry path.
    async fn store_for(
        &self,
        node: &Node,
        bucket: &str,
        fresh_session: bool,
    ) -> Result<Storage, AccessError> {
        let key = node.client_fingerprint("s3", bucket);

        if !node.is_cloud() {
            if let Some(cached) = self.stores.read().get(&key) {
                return Ok(cached.storage.clone());
            }
            let storage = Storage::for_node(node, bucket, None)?;
            self.stores.write().insert(
                key,
                CachedStore {
                    session_key: None,
                    storage: storage.clone(),
                },
            );
            return Ok(storage);
        }

        let session = if fresh_session {
            self.creds.refresh(node, bucket).await
        } else {
            self.creds.get(node, bucket).await
        }
        .map_err(|e| AccessError::CredentialExchange {
            node: node.name.clone(),
            detail: e.to_string(),
        })?;

        if !fresh_session {
            if let Some(cached) = self.stores.read().get(&key) {
                if cached.session_key.as_deref() == Some(session.access_key_id.as_str()) {
                    return Ok(cached.storage.clone());
                }
            }
        }

        let storage = Storage::for_node(node, bucket, Some(&session))?;
        self.stores.write().insert(
            key,
            CachedStore {
                session_key: Some(session.access_key_id.clone()),
                storage: storage.clone(),
            },
        );
        Ok(storage)
    }
}
