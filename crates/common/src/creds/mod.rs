//! Ephemeral credential exchange for cloud-backed nodes.
//!
//! Cloud nodes are never accessed with their long-lived keys. Every resolved
//! access first obtains (or reuses) a time-bounded session token via the
//! node's secure-token exchange, scoped by an inline session policy to the
//! bucket being touched. Tokens live only in process memory.

mod policy;
mod sigv4;
mod sts;

pub use policy::session_policy;
pub use sts::StsClient;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;

use crate::node::{Node, NodeError};

/// Tokens within this window of expiry are treated as already expired, so a
/// token never dies mid-request.
const EXPIRY_SLACK_SECS: i64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("node '{0}' is not cloud-backed, exchange is not applicable")]
    StaticBackend(String),
    #[error(transparent)]
    StsEndpoint(#[from] NodeError),
    #[error("token exchange request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("token exchange rejected with status {status}: {detail}")]
    Rejected {
        status: reqwest::StatusCode,
        detail: String,
    },
    #[error("malformed token exchange response: {0}")]
    MalformedResponse(String),
}

/// A short-lived credential triple obtained from a secure-token exchange.
///
/// The secret parts are excluded from `Debug` output and are never persisted
/// anywhere; dropping the process drops the session.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredentials {
    pub access_key_id: String,
    secret_access_key: String,
    session_token: String,
    pub expiration: DateTime<Utc>,
}

impl SessionCredentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: impl Into<String>,
        expiration: DateTime<Utc>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: session_token.into(),
            expiration,
        }
    }

    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    pub fn session_token(&self) -> &str {
        &self.session_token
    }

    pub fn is_expired(&self) -> bool {
        self.expiration - Duration::seconds(EXPIRY_SLACK_SECS) <= Utc::now()
    }
}

impl std::fmt::Debug for SessionCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &"<redacted>")
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// The seam between the access layer and whatever performs the actual token
/// exchange. Production uses [`StsClient`]; tests inject counters and
/// failure modes.
#[async_trait::async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Exchange the node's long-lived keys for session credentials scoped to
    /// `bucket`.
    async fn exchange(&self, node: &Node, bucket: &str)
        -> Result<SessionCredentials, ExchangeError>;
}

/// Per-node memoization of session credentials.
///
/// Sessions are keyed by the node's client fingerprint plus the bucket the
/// policy was scoped to. Expired entries are re-exchanged on access;
/// [`CredentialCache::refresh`] forces a fresh exchange after an
/// auth-rejected storage call.
pub struct CredentialCache {
    provider: Arc<dyn CredentialProvider>,
    sessions: RwLock<HashMap<String, SessionCredentials>>,
}

impl CredentialCache {
    pub fn new(provider: Arc<dyn CredentialProvider>) -> Self {
        Self {
            provider,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn key(node: &Node, bucket: &str) -> String {
        node.client_fingerprint("sts", bucket)
    }

    /// Get a valid session for `(node, bucket)`, exchanging only when the
    /// cached one is missing or expired.
    pub async fn get(
        &self,
        node: &Node,
        bucket: &str,
    ) -> Result<SessionCredentials, ExchangeError> {
        let key = Self::key(node, bucket);
        if let Some(session) = self.sessions.read().get(&key) {
            if !session.is_expired() {
                return Ok(session.clone());
            }
        }
        self.exchange_and_store(node, bucket, key).await
    }

    /// Discard any cached session and perform a fresh exchange.
    pub async fn refresh(
        &self,
        node: &Node,
        bucket: &str,
    ) -> Result<SessionCredentials, ExchangeError> {
        let key = Self::key(node, bucket);
        self.sessions.write().remove(&key);
        self.exchange_and_store(node, bucket, key).await
    }

    async fn exchange_and_store(
        &self,
        node: &Node,
        bucket: &str,
        key: String,
    ) -> Result<SessionCredentials, ExchangeError> {
        tracing::debug!(node = %node.name, bucket, "exchanging session credentials");
        let session = self.provider.exchange(node, bucket).await?;
        self.sessions.write().insert(key, session.clone());
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{BackendKind, Credentials, FederationParams, DEFAULT_REGION};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use url::Url;
    use uuid::Uuid;

    pub(crate) struct CountingProvider {
        pub calls: AtomicUsize,
        pub ttl_secs: i64,
    }

    impl CountingProvider {
        pub fn new(ttl_secs: i64) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                ttl_secs,
            }
        }
    }

    #[async_trait::async_trait]
    impl CredentialProvider for CountingProvider {
        async fn exchange(
            &self,
            _node: &Node,
            _bucket: &str,
        ) -> Result<SessionCredentials, ExchangeError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SessionCredentials::new(
                format!("STS-AK-{}", n),
                "sts-secret",
                "sts-token",
                Utc::now() + Duration::seconds(self.ttl_secs),
            ))
        }
    }

    pub(crate) fn cloud_node() -> Node {
        Node {
            id: Uuid::new_v4(),
            name: "cloud1".to_string(),
            endpoint: Url::parse("https://s3.us-east-1.amazonaws.com").unwrap(),
            region: DEFAULT_REGION.to_string(),
            credentials: Credentials::new("AK", "SK"),
            kind: BackendKind::Cloud {
                federation: FederationParams {
                    sts_api_url: None,
                    role_arn: "arn:aws:iam::123456789012:role/workspaces".to_string(),
                },
            },
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_valid_session_is_reused() {
        let provider = Arc::new(CountingProvider::new(3600));
        let cache = CredentialCache::new(provider.clone());
        let node = cloud_node();

        let first = cache.get(&node, "bucket1").await.unwrap();
        let second = cache.get(&node, "bucket1").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_session_is_re_exchanged() {
        // TTL inside the expiry slack, so the first token is born expired.
        let provider = Arc::new(CountingProvider::new(5));
        let cache = CredentialCache::new(provider.clone());
        let node = cloud_node();

        cache.get(&node, "bucket1").await.unwrap();
        cache.get(&node, "bucket1").await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_sessions_are_scoped_per_bucket() {
        let provider = Arc::new(CountingProvider::new(3600));
        let cache = CredentialCache::new(provider.clone());
        let node = cloud_node();

        cache.get(&node, "bucket1").await.unwrap();
        cache.get(&node, "bucket2").await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_refresh_forces_exchange() {
        let provider = Arc::new(CountingProvider::new(3600));
        let cache = CredentialCache::new(provider.clone());
        let node = cloud_node();

        cache.get(&node, "bucket1").await.unwrap();
        cache.refresh(&node, "bucket1").await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_session_secrets_redacted_in_debug() {
        let session =
            SessionCredentials::new("STS-AK", "supersecret", "supertoken", Utc::now());
        let rendered = format!("{:?}", session);
        assert!(rendered.contains("STS-AK"));
        assert!(!rendered.contains("supersecret"));
        assert!(!rendered.contains("supertoken"));
    }
}
