//! Integration tests for node/root resolution semantics

mod common;

use ::common::resolver::{resolve, ResolveError};
use ::common::root::base_paths_conflict;

#[test]
fn test_admin_scenario_shared_root() {
    // node n1 at a self-hosted endpoint, root `shared/` in bucket1.
    let n1 = common::self_hosted_node("n1", "http://localhost:9000");
    let roots = vec![common::root_on(&n1, "bucket1", "shared/", 0)];

    let resolved = resolve(&roots, "shared/doc.txt").unwrap();
    assert_eq!(resolved.root.node_id, n1.id);
    assert_eq!(resolved.root.bucket, "bucket1");
    assert_eq!(resolved.sub_path, "doc.txt");

    let err = resolve(&roots, "other/doc.txt").unwrap_err();
    assert!(matches!(err, ResolveError::NoMatchingRoot(_)));
}

#[test]
fn test_nested_root_shadows_catch_all() {
    let n1 = common::self_hosted_node("n1", "http://localhost:9000");
    let catch_all = common::root_on(&n1, "bucketA", "", 60);
    let public = common::root_on(&n1, "bucketA", "public/", 30);

    // The two coexist on the same node and bucket.
    assert!(!base_paths_conflict(&catch_all.base_path, &public.base_path));

    let roots = vec![catch_all, public];
    let resolved = resolve(&roots, "public/file.txt").unwrap();
    assert_eq!(resolved.root.base_path, "public/");
    assert_eq!(resolved.sub_path, "file.txt");

    // Everything outside the carve-out falls to the catch-all.
    let resolved = resolve(&roots, "misc/file.txt").unwrap();
    assert_eq!(resolved.root.base_path, "");
    assert_eq!(resolved.sub_path, "misc/file.txt");
}

#[test]
fn test_roots_on_different_nodes_partition_the_namespace() {
    let n1 = common::self_hosted_node("n1", "http://localhost:9000");
    let n2 = common::self_hosted_node("n2", "http://localhost:9100");
    let roots = vec![
        common::root_on(&n1, "bucket1", "alpha/", 10),
        common::root_on(&n2, "bucket2", "beta/", 10),
    ];

    assert_eq!(resolve(&roots, "alpha/x").unwrap().root.node_id, n1.id);
    assert_eq!(resolve(&roots, "beta/x").unwrap().root.node_id, n2.id);
}

#[test]
fn test_object_key_includes_base_path() {
    let n1 = common::self_hosted_node("n1", "http://localhost:9000");
    let roots = vec![common::root_on(&n1, "bucket1", "shared/", 0)];

    let resolved = resolve(&roots, "shared/reports/q3.csv").unwrap();
    assert_eq!(resolved.sub_path, "reports/q3.csv");
    assert_eq!(resolved.object_key(), "shared/reports/q3.csv");
}
