//! Storage node bindings.
//!
//! A [`Node`] is a named, authenticated binding to one S3-compatible storage
//! backend. Self-hosted nodes (MinIO and friends) are reached with their
//! long-lived access keys; cloud nodes additionally carry federation
//! parameters and are only ever accessed with short-lived session
//! credentials obtained through a secure-token exchange.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Default region applied when an administrator does not pass one.
pub const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("invalid STS endpoint for node '{name}': {source}")]
    InvalidStsEndpoint {
        name: String,
        source: url::ParseError,
    },
}

/// A long-lived access key pair.
///
/// The secret is deliberately excluded from `Debug` output. Nothing in this
/// crate serializes a `Credentials` value back out; API responses carry only
/// the access key id.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    secret_access_key: String,
}

impl Credentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }

    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// Federation parameters for a cloud-backed node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederationParams {
    /// Optional dedicated STS endpoint. When unset the provider default
    /// `https://sts.{region}.amazonaws.com` is used.
    pub sts_api_url: Option<Url>,
    /// Role assumed when exchanging for session credentials. This role
    /// should itself carry no permissions; access is granted by the inline
    /// session policy attached to each exchange.
    pub role_arn: String,
}

/// What kind of backend a node points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackendKind {
    /// Self-hosted S3-compatible instance, accessed with static keys.
    SelfHosted,
    /// Cloud object storage, accessed through temporary session credentials.
    Cloud { federation: FederationParams },
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::SelfHosted => "self_hosted",
            BackendKind::Cloud { .. } => "cloud",
        }
    }
}

/// A configured, authenticated binding to one object-storage backend.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: Uuid,
    /// Globally unique within the application.
    pub name: String,
    /// The API url the service references this backend as.
    pub endpoint: Url,
    pub region: String,
    pub credentials: Credentials,
    pub kind: BackendKind,
    pub created_at: DateTime<Utc>,
}

impl Node {
    pub fn is_cloud(&self) -> bool {
        matches!(self.kind, BackendKind::Cloud { .. })
    }

    pub fn federation(&self) -> Option<&FederationParams> {
        match &self.kind {
            BackendKind::Cloud { federation } => Some(federation),
            BackendKind::SelfHosted => None,
        }
    }

    /// Endpoint used for the secure-token exchange.
    ///
    /// A configured `sts_api_url` always wins. Cloud nodes without one get
    /// the provider's regional STS endpoint; self-hosted nodes serve STS on
    /// their API port.
    pub fn sts_endpoint(&self) -> Result<Url, NodeError> {
        match self.federation() {
            Some(FederationParams {
                sts_api_url: Some(url),
                ..
            }) => Ok(url.clone()),
            Some(_) => Url::parse(&format!("https://sts.{}.amazonaws.com", self.region)).map_err(
                |source| NodeError::InvalidStsEndpoint {
                    name: self.name.clone(),
                    source,
                },
            ),
            None => Ok(self.endpoint.clone()),
        }
    }

    /// Plain-http endpoints (local MinIO) need the S3 client to allow http.
    pub fn allows_http(&self) -> bool {
        self.endpoint.scheme() == "http"
    }

    /// Cache key for per-node clients.
    ///
    /// There may be many storage nodes in a cluster; established clients are
    /// cached under a digest of their connection identity so equivalent
    /// bindings share one client. `client_type` distinguishes s3 from sts
    /// clients, `scope` narrows further (e.g. to a bucket or session).
    pub fn client_fingerprint(&self, client_type: &str, scope: &str) -> String {
        use sha2::{Digest, Sha256};

        let identity = format!(
            "{}{}{}{}{}{}",
            client_type,
            self.region,
            self.endpoint,
            self.credentials.access_key_id,
            self.credentials.secret_access_key(),
            scope
        )
        .to_lowercase();
        hex::encode(Sha256::digest(identity.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(kind: BackendKind) -> Node {
        Node {
            id: Uuid::new_v4(),
            name: "n1".to_string(),
            endpoint: Url::parse("http://localhost:9000").unwrap(),
            region: DEFAULT_REGION.to_string(),
            credentials: Credentials::new("AK", "SK"),
            kind,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_secret_redacted_in_debug() {
        let n = node(BackendKind::SelfHosted);
        let rendered = format!("{:?}", n);
        assert!(rendered.contains("AK"));
        assert!(!rendered.contains("SK"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_sts_endpoint_self_hosted_uses_api_url() {
        let n = node(BackendKind::SelfHosted);
        assert_eq!(n.sts_endpoint().unwrap(), n.endpoint);
    }

    #[test]
    fn test_sts_endpoint_cloud_defaults_to_regional() {
        let n = node(BackendKind::Cloud {
            federation: FederationParams {
                sts_api_url: None,
                role_arn: "arn:aws:iam::123456789012:role/workspaces".to_string(),
            },
        });
        assert_eq!(
            n.sts_endpoint().unwrap().as_str(),
            "https://sts.us-east-1.amazonaws.com/"
        );
    }

    #[test]
    fn test_sts_endpoint_override_wins() {
        let n = node(BackendKind::Cloud {
            federation: FederationParams {
                sts_api_url: Some(Url::parse("http://localhost:9100").unwrap()),
                role_arn: "arn:minio:iam:::role/dummy".to_string(),
            },
        });
        assert_eq!(n.sts_endpoint().unwrap().as_str(), "http://localhost:9100/");
    }
}
