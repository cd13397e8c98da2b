/**
 * Credential exchange for cloud-backed nodes.
 *  - Session token acquisition via STS AssumeRole
 *  - Per-node credential caching with expiry
 *  - Scoped session policies
 */
pub mod creds;
/**
 * Storage node bindings: endpoint, region,
 *  access credentials, and backend kind
 *  (self-hosted vs cloud-federated).
 */
pub mod node;
/**
 * Resolution of logical workspace paths to
 *  (root, effective sub-path) pairs by
 *  longest-prefix match.
 */
pub mod resolver;
/**
 * Workspace roots: a bucket plus optional base
 *  path bound to exactly one storage node.
 */
pub mod root;
/**
 * Storage layer implementation.
 *  Just a light wrapper around the object_store
 *  crate plus a fingerprint-keyed client cache.
 */
pub mod storage;
/**
 * Helper for exposing build version information.
 */
pub mod version;

pub mod prelude {
    pub use crate::creds::{CredentialCache, CredentialProvider, SessionCredentials, StsClient};
    pub use crate::node::{BackendKind, Credentials, FederationParams, Node};
    pub use crate::resolver::{resolve, ResolveError, Resolved};
    pub use crate::root::{Root, RootType};
    pub use crate::storage::{AccessError, NodeGateway, ObjectInfo, Storage, StorageError};
    pub use crate::version::build_info;
}
