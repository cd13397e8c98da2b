//! Object storage backend abstraction.
//!
//! A [`Storage`] is a handle on one backend binding (node + bucket +
//! credentials) exposing the uniform capability set: put, get, list, delete,
//! signed URLs. Object content is delegated verbatim; nothing here
//! reinterprets what is stored.

mod gateway;

pub use gateway::{AccessError, NodeGateway};

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::signer::Signer;
use object_store::ObjectStore;
use url::Url;

use crate::creds::SessionCredentials;
use crate::node::Node;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("object storage error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("invalid storage configuration: {0}")]
    InvalidConfig(String),

    #[error("object not found: {0}")]
    ObjectNotFound(String),

    #[error("backend does not support signed URLs")]
    SignedUrlUnsupported,
}

impl StorageError {
    /// Whether the backend rejected our credentials (expired or revoked
    /// session, bad signature). The underlying client flattens these into
    /// generic errors, so this goes by the backend's error code strings.
    pub fn is_auth_rejected(&self) -> bool {
        match self {
            StorageError::ObjectStore(e) => {
                let msg = e.to_string();
                msg.contains("ExpiredToken")
                    || msg.contains("InvalidToken")
                    || msg.contains("InvalidAccessKeyId")
                    || msg.contains("SignatureDoesNotMatch")
                    || msg.contains("AccessDenied")
                    || msg.contains("403")
            }
            _ => false,
        }
    }
}

/// Listing entry returned by [`Storage::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    /// Full object key within the bucket.
    pub key: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

/// Handle on one object-storage backend binding.
#[derive(Clone)]
pub struct Storage {
    inner: Arc<dyn ObjectStore>,
    signer: Option<Arc<dyn Signer>>,
}

impl Storage {
    /// Build a backend client for `node`/`bucket`.
    ///
    /// Self-hosted nodes authenticate with the node's static keys; cloud
    /// nodes must pass the session obtained from the credential exchange.
    pub fn for_node(
        node: &Node,
        bucket: &str,
        session: Option<&SessionCredentials>,
    ) -> Result<Self, StorageError> {
        let mut builder = AmazonS3Builder::new()
            .with_endpoint(node.endpoint.as_str().trim_end_matches('/'))
            .with_bucket_name(bucket)
            .with_region(&node.region)
            .with_allow_http(node.allows_http());

        builder = match session {
            Some(session) => builder
                .with_access_key_id(&session.access_key_id)
                .with_secret_access_key(session.secret_access_key())
                .with_token(session.session_token()),
            None => builder
                .with_access_key_id(&node.credentials.access_key_id)
                .with_secret_access_key(node.credentials.secret_access_key()),
        };

        let store: Arc<AmazonS3> = Arc::new(
            builder
                .build()
                .map_err(|e| StorageError::InvalidConfig(e.to_string()))?,
        );

        Ok(Self {
            inner: store.clone(),
            signer: Some(store),
        })
    }

    /// In-memory backend for tests and local experiments.
    pub fn memory() -> Self {
        Self {
            inner: Arc::new(InMemory::new()),
            signer: None,
        }
    }

    pub async fn put(&self, key: &str, data: Bytes) -> Result<(), StorageError> {
        let path = ObjectPath::from(key);
        self.inner.put(&path, data.into()).await?;
        Ok(())
    }

    pub async fn get(&self, key: &str) -> Result<Bytes, StorageError> {
        let path = ObjectPath::from(key);
        match self.inner.get(&path).await {
            Ok(result) => Ok(result.bytes().await?),
            Err(object_store::Error::NotFound { .. }) => {
                Err(StorageError::ObjectNotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// List objects under `prefix` (empty prefix lists the whole bucket).
    pub async fn list(&self, prefix: &str) -> Result<Vec<ObjectInfo>, StorageError> {
        let prefix = ObjectPath::from(prefix);
        let stream = self.inner.list(Some(&prefix));
        let items: Vec<_> = stream.try_collect().await?;

        Ok(items
            .into_iter()
            .map(|meta| ObjectInfo {
                key: meta.location.to_string(),
                size: meta.size as u64,
                last_modified: meta.last_modified,
            })
            .collect())
    }

    /// Delete an object. Deleting an already-absent key is not an error.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = ObjectPath::from(key);
        match self.inner.delete(&path).await {
            Ok(()) => Ok(()),
            Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Presign a URL for direct client access to `key`.
    pub async fn signed_url(
        &self,
        method: http::Method,
        key: &str,
        expires_in: Duration,
    ) -> Result<Url, StorageError> {
        let signer = self
            .signer
            .as_ref()
            .ok_or(StorageError::SignedUrlUnsupported)?;
        let path = ObjectPath::from(key);
        Ok(signer.signed_url(method, &path, expires_in).await?)
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("signer", &self.signer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_put_get_delete() {
        let storage = Storage::memory();
        let data = Bytes::from("hello world");

        storage.put("shared/doc.txt", data.clone()).await.unwrap();
        let retrieved = storage.get("shared/doc.txt").await.unwrap();
        assert_eq!(retrieved, data);

        storage.delete("shared/doc.txt").await.unwrap();
        let err = storage.get("shared/doc.txt").await.unwrap_err();
        assert!(matches!(err, StorageError::ObjectNotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_ok() {
        let storage = Storage::memory();
        storage.delete("never/existed").await.unwrap();
    }

    #[tokio::test]
    async fn test_list_scoped_by_prefix() {
        let storage = Storage::memory();
        storage
            .put("shared/a.txt", Bytes::from("a"))
            .await
            .unwrap();
        storage
            .put("shared/sub/b.txt", Bytes::from("bb"))
            .await
            .unwrap();
        storage
            .put("other/c.txt", Bytes::from("ccc"))
            .await
            .unwrap();

        let mut listed = storage.list("shared/").await.unwrap();
        listed.sort_by(|a, b| a.key.cmp(&b.key));
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].key, "shared/a.txt");
        assert_eq!(listed[0].size, 1);
        assert_eq!(listed[1].key, "shared/sub/b.txt");
    }

    #[tokio::test]
    async fn test_memory_has_no_signer() {
        let storage = Storage::memory();
        let err = storage
            .signed_url(http::Method::GET, "a", Duration::from_secs(60))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::SignedUrlUnsupported));
    }

    #[test]
    fn test_auth_rejection_classifier() {
        let auth = StorageError::ObjectStore(object_store::Error::Generic {
            store: "S3",
            source: "response error: ExpiredToken".into(),
        });
        assert!(auth.is_auth_rejected());

        let other = StorageError::ObjectNotFound("x".to_string());
        assert!(!other.is_auth_rejected());
    }
}
