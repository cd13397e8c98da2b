//! Workspace roots.
//!
//! A root maps a logical path prefix onto `{node, bucket, base path}`. Roots
//! are the unit of storage configuration: every object operation resolves to
//! exactly one root, and through it to one backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access-control default for workspaces under a root.
///
/// Public roots are world-readable by default; private roots require
/// per-user authorization. The policy itself is owned by the surrounding
/// application, not by this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RootType {
    Public,
    Private,
}

impl RootType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RootType::Public => "public",
            RootType::Private => "private",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "private" => RootType::Private,
            _ => RootType::Public,
        }
    }
}

impl std::fmt::Display for RootType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bucket and optional base path bound to exactly one storage node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Root {
    pub id: Uuid,
    pub node_id: Uuid,
    pub root_type: RootType,
    pub bucket: String,
    /// Normalized prefix within the bucket; empty, or `/`-terminated.
    pub base_path: String,
    pub created_at: DateTime<Utc>,
}

impl Root {
    /// Whether two roots carve out overlapping territory.
    ///
    /// Only roots on the same node and bucket can conflict. The empty base
    /// path is the bucket's catch-all and coexists with nested roots;
    /// resolution picks the longest matching prefix.
    pub fn conflicts_with(&self, other: &Root) -> bool {
        self.node_id == other.node_id
            && self.bucket == other.bucket
            && base_paths_conflict(&self.base_path, &other.base_path)
    }
}

/// Normalize an administrator-supplied base path.
///
/// Leading and trailing slashes are stripped, and a single trailing slash is
/// appended to non-empty paths so prefix comparisons stay segment-aligned.
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}/", trimmed)
    }
}

/// Overlap predicate over two normalized base paths.
pub fn base_paths_conflict(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    // Empty is the catch-all; nested roots are shadow carve-outs, not conflicts.
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.starts_with(b) || b.starts_with(a)
}
