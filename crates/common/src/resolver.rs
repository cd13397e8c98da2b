//! Logical path resolution.
//!
//! Maps a logical workspace path onto the root responsible for it by
//! longest-prefix match over registered roots' base paths, yielding the
//! effective sub-path within that root. Resolution is a pure function over a
//! slice of roots; callers re-read configuration per request, so there is no
//! in-process copy to invalidate.

use crate::root::Root;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("no root matches path '{0}'")]
    NoMatchingRoot(String),
    #[error("empty path")]
    EmptyPath,
}

/// Outcome of resolving a logical path.
#[derive(Debug, Clone)]
pub struct Resolved<'a> {
    pub root: &'a Root,
    /// Path relative to the root's base path.
    pub sub_path: String,
}

impl Resolved<'_> {
    /// Full object key within the root's bucket.
    pub fn object_key(&self) -> String {
        format!("{}{}", self.root.base_path, self.sub_path)
    }
}

/// Resolve `path` against `roots` by longest-prefix match.
///
/// A root with base path `shared/` matches `shared/doc.txt` (sub-path
/// `doc.txt`) and the bare prefix `shared` (empty sub-path). The empty base
/// path matches everything. Ties on prefix length break toward the
/// earliest-created root.
pub fn resolve<'a>(roots: &'a [Root], path: &str) -> Result<Resolved<'a>, ResolveError> {
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return Err(ResolveError::EmptyPath);
    }

    let mut best: Option<&Root> = None;
    for root in roots {
        let matches = path.starts_with(&root.base_path)
            || format!("{}/", path) == root.base_path;
        if !matches {
            continue;
        }
        best = match best {
            None => Some(root),
            Some(current) => {
                if root.base_path.len() > current.base_path.len()
                    || (root.base_path.len() == current.base_path.len()
                        && root.created_at < current.created_at)
                {
                    Some(root)
                } else {
                    Some(current)
                }
            }
        };
    }

    let root = best.ok_or_else(|| ResolveError::NoMatchingRoot(path.to_string()))?;
    let sub_path = path
        .strip_prefix(root.base_path.as_str())
        .unwrap_or("")
        .to_string();
    Ok(Resolved { root, sub_path })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::root::RootType;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn root(bucket: &str, base_path: &str, age_secs: i64) -> Root {
        Root {
            id: Uuid::new_v4(),
            node_id: Uuid::new_v4(),
            root_type: RootType::Public,
            bucket: bucket.to_string(),
            base_path: base_path.to_string(),
            created_at: Utc::now() - Duration::seconds(age_secs),
        }
    }

    #[test]
    fn test_longest_prefix_wins() {
        let roots = vec![root("bucketA", "", 10), root("bucketA", "public/", 5)];

        let resolved = resolve(&roots, "public/file.txt").unwrap();
        assert_eq!(resolved.root.base_path, "public/");
        assert_eq!(resolved.sub_path, "file.txt");
        assert_eq!(resolved.object_key(), "public/file.txt");
    }

    #[test]
    fn test_catch_all_matches_everything_else() {
        let roots = vec![root("bucketA", "", 10), root("bucketA", "public/", 5)];

        let resolved = resolve(&roots, "other/file.txt").unwrap();
        assert_eq!(resolved.root.base_path, "");
        assert_eq!(resolved.sub_path, "other/file.txt");
    }

    #[test]
    fn test_no_matching_root() {
        let roots = vec![root("bucket1", "shared/", 0)];

        let err = resolve(&roots, "other/doc.txt").unwrap_err();
        assert!(matches!(err, ResolveError::NoMatchingRoot(_)));
    }

    #[test]
    fn test_bare_prefix_matches_with_empty_sub_path() {
        let roots = vec![root("bucket1", "shared/", 0)];

        let resolved = resolve(&roots, "shared").unwrap();
        assert_eq!(resolved.sub_path, "");
        let resolved = resolve(&roots, "shared/").unwrap();
        assert_eq!(resolved.sub_path, "");
    }

    #[test]
    fn test_leading_slash_is_ignored() {
        let roots = vec![root("bucket1", "shared/", 0)];

        let resolved = resolve(&roots, "/shared/doc.txt").unwrap();
        assert_eq!(resolved.sub_path, "doc.txt");
    }

    #[test]
    fn test_tie_breaks_toward_earliest_created() {
        // Same-length base paths on different buckets; the older root wins.
        let older = root("bucketA", "shared/", 100);
        let newer = root("bucketB", "shared/", 1);
        let older_id = older.id;

        let roots = vec![newer, older];
        let resolved = resolve(&roots, "shared/doc.txt").unwrap();
        assert_eq!(resolved.root.id, older_id);
    }

    #[test]
    fn test_empty_path_rejected() {
        let roots = vec![root("bucket1", "", 0)];
        assert!(matches!(resolve(&roots, ""), Err(ResolveError::EmptyPath)));
        assert!(matches!(resolve(&roots, "/"), Err(ResolveError::EmptyPath)));
    }
}
