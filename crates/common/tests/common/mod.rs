//! Shared test utilities for resolution integration tests
#![allow(dead_code)]

use chrono::{Duration, Utc};
use url::Url;
use uuid::Uuid;

use ::common::node::{BackendKind, Credentials, Node, DEFAULT_REGION};
use ::common::root::{normalize_base_path, Root, RootType};

/// A self-hosted node pointing at a local MinIO-style endpoint.
pub fn self_hosted_node(name: &str, endpoint: &str) -> Node {
    Node {
        id: Uuid::new_v4(),
        name: name.to_string(),
        endpoint: Url::parse(endpoint).unwrap(),
        region: DEFAULT_REGION.to_string(),
        credentials: Credentials::new("AK", "SK"),
        kind: BackendKind::SelfHosted,
        created_at: Utc::now(),
    }
}

/// A root on `node`, created `age_secs` ago.
pub fn root_on(node: &Node, bucket: &str, base_path: &str, age_secs: i64) -> Root {
    Root {
        id: Uuid::new_v4(),
        node_id: node.id,
        root_type: RootType::Public,
        bucket: bucket.to_string(),
        base_path: normalize_base_path(base_path),
        created_at: Utc::now() - Duration::seconds(age_secs),
    }
}
